use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::alert::{
    Alerta, EstadoAlerta, NuevaAlerta, DEFAULT_CIUDAD, DEFAULT_DESCRIPCION, DEFAULT_PAIS,
    DEFAULT_SEVERIDAD, DEFAULT_TIPO, FUENTE_MANUAL,
};
use crate::models::filter::AlertFilter;
use crate::repository::AlertRepository;

/// Owns the alert state machine: creation with defaults, irreversible
/// resolution, maintenance deletion and the lifecycle-state read paths.
#[derive(Clone)]
pub struct AlertService {
    repo: Arc<dyn AlertRepository>,
}

impl AlertService {
    pub fn new(repo: Arc<dyn AlertRepository>) -> Self {
        Self { repo }
    }

    /// Creates an alert in `ACTIVA` state. A supplied `sensorId` must parse
    /// as a UUID; a malformed one is a validation failure, never coerced to
    /// absent.
    pub async fn create(&self, input: NuevaAlerta) -> Result<Alerta, ServiceError> {
        let sensor_id = match input.sensor_id.as_deref() {
            None => None,
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|e| {
                ServiceError::Validation(format!("sensorId inválido '{}': {}", raw, e))
            })?),
        };

        let alerta = Alerta {
            id: Uuid::new_v4(),
            sensor_id,
            tipo: input.tipo.unwrap_or_else(|| DEFAULT_TIPO.to_string()),
            descripcion: input
                .descripcion
                .unwrap_or_else(|| DEFAULT_DESCRIPCION.to_string()),
            severidad: DEFAULT_SEVERIDAD.to_string(),
            ciudad: input.ciudad.unwrap_or_else(|| DEFAULT_CIUDAD.to_string()),
            pais: input.pais.unwrap_or_else(|| DEFAULT_PAIS.to_string()),
            detalles: input.detalles.unwrap_or_else(|| Value::Object(Map::new())),
            fecha: Utc::now(),
            fuente: FUENTE_MANUAL.to_string(),
            estado: EstadoAlerta::Activa,
        };

        let alerta = self.repo.insert(alerta).await?;
        info!("Created alert {} ({})", alerta.id, alerta.tipo);
        Ok(alerta)
    }

    /// Transitions the alert to `RESUELTA`. Idempotent: resolving an already
    /// resolved alert succeeds and leaves it resolved.
    pub async fn resolve(&self, id: Uuid) -> Result<Alerta, ServiceError> {
        let mut alerta = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no existe la alerta {}", id)))?;
        alerta.estado = EstadoAlerta::Resuelta;
        let alerta = self.repo.update(alerta).await?;
        info!("Resolved alert {}", alerta.id);
        Ok(alerta)
    }

    /// Removes the alert unconditionally. Maintenance operation, available
    /// from any state.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(format!("no existe la alerta {}", id)));
        }
        info!("Deleted alert {}", id);
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Alerta>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn list_by_estado(&self, estado: EstadoAlerta) -> Result<Vec<Alerta>, ServiceError> {
        self.repo.find_by_estado(estado).await
    }

    pub async fn find_by_location(
        &self,
        ciudad: String,
        pais: String,
    ) -> Result<Vec<Alerta>, ServiceError> {
        self.repo
            .find_by_filter(&AlertFilter::by_location(ciudad, pais))
            .await
    }

    pub async fn filter(&self, filtro: &AlertFilter) -> Result<Vec<Alerta>, ServiceError> {
        self.repo.find_by_filter(filtro).await
    }
}
