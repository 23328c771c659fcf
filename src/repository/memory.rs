use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::alert::{Alerta, EstadoAlerta};
use crate::models::filter::AlertFilter;
use crate::repository::AlertRepository;

/// In-memory alert store, used by tests and local development. Keeps alerts
/// in insertion order.
#[derive(Default)]
pub struct MemoryAlertRepository {
    alertas: RwLock<Vec<Alerta>>,
}

impl MemoryAlertRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertRepository for MemoryAlertRepository {
    async fn insert(&self, alerta: Alerta) -> Result<Alerta, ServiceError> {
        self.alertas.write().await.push(alerta.clone());
        Ok(alerta)
    }

    async fn find_all(&self) -> Result<Vec<Alerta>, ServiceError> {
        Ok(self.alertas.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alerta>, ServiceError> {
        Ok(self
            .alertas
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_filter(&self, filtro: &AlertFilter) -> Result<Vec<Alerta>, ServiceError> {
        Ok(self
            .alertas
            .read()
            .await
            .iter()
            .filter(|a| filtro.matches(a))
            .cloned()
            .collect())
    }

    async fn find_by_estado(&self, estado: EstadoAlerta) -> Result<Vec<Alerta>, ServiceError> {
        Ok(self
            .alertas
            .read()
            .await
            .iter()
            .filter(|a| a.estado == estado)
            .cloned()
            .collect())
    }

    async fn update(&self, alerta: Alerta) -> Result<Alerta, ServiceError> {
        let mut alertas = self.alertas.write().await;
        match alertas.iter_mut().find(|a| a.id == alerta.id) {
            Some(existing) => {
                *existing = alerta.clone();
                Ok(alerta)
            }
            None => Err(ServiceError::NotFound(format!(
                "no existe la alerta {}",
                alerta.id
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut alertas = self.alertas.write().await;
        let before = alertas.len();
        alertas.retain(|a| a.id != id);
        Ok(alertas.len() < before)
    }
}
