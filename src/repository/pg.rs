use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::db::{queries, DbPool};
use crate::error::ServiceError;
use crate::models::alert::{Alerta, EstadoAlerta};
use crate::models::filter::AlertFilter;
use crate::repository::AlertRepository;

/// Postgres-backed alert store. Concurrency control is left to the database;
/// this layer adds no locking of its own.
pub struct PgAlertRepository {
    pool: DbPool,
}

impl PgAlertRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_alerta(row: &PgRow) -> Result<Alerta, ServiceError> {
    let estado_raw: String = row.try_get("estado")?;
    let estado: EstadoAlerta = estado_raw.parse().map_err(ServiceError::Internal)?;
    let detalles: Json<Value> = row.try_get("detalles")?;
    let fecha: DateTime<Utc> = row.try_get("fecha")?;

    Ok(Alerta {
        id: row.try_get("id")?,
        sensor_id: row.try_get("sensor_id")?,
        tipo: row.try_get("tipo")?,
        descripcion: row.try_get("descripcion")?,
        severidad: row.try_get("severidad")?,
        ciudad: row.try_get("ciudad")?,
        pais: row.try_get("pais")?,
        detalles: detalles.0,
        fecha,
        fuente: row.try_get("fuente")?,
        estado,
    })
}

#[async_trait]
impl AlertRepository for PgAlertRepository {
    async fn insert(&self, alerta: Alerta) -> Result<Alerta, ServiceError> {
        sqlx::query(queries::INSERT_ALERT)
            .bind(alerta.id)
            .bind(alerta.sensor_id)
            .bind(&alerta.tipo)
            .bind(&alerta.descripcion)
            .bind(&alerta.severidad)
            .bind(&alerta.ciudad)
            .bind(&alerta.pais)
            .bind(Json(&alerta.detalles))
            .bind(alerta.fecha)
            .bind(&alerta.fuente)
            .bind(alerta.estado.as_str())
            .execute(&self.pool)
            .await?;
        Ok(alerta)
    }

    async fn find_all(&self) -> Result<Vec<Alerta>, ServiceError> {
        let rows = sqlx::query(queries::SELECT_ALL_ALERTS)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_alerta).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alerta>, ServiceError> {
        let row = sqlx::query(queries::SELECT_ALERT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_alerta).transpose()
    }

    async fn find_by_filter(&self, filtro: &AlertFilter) -> Result<Vec<Alerta>, ServiceError> {
        let mut qb = QueryBuilder::<Postgres>::new(queries::SELECT_ALERT_COLUMNS);
        filtro.push_conditions(&mut qb);
        qb.push(" ORDER BY fecha");
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_alerta).collect()
    }

    async fn find_by_estado(&self, estado: EstadoAlerta) -> Result<Vec<Alerta>, ServiceError> {
        let rows = sqlx::query(queries::SELECT_ALERTS_BY_ESTADO)
            .bind(estado.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_alerta).collect()
    }

    async fn update(&self, alerta: Alerta) -> Result<Alerta, ServiceError> {
        let result = sqlx::query(queries::UPDATE_ALERT)
            .bind(alerta.id)
            .bind(alerta.sensor_id)
            .bind(&alerta.tipo)
            .bind(&alerta.descripcion)
            .bind(&alerta.severidad)
            .bind(&alerta.ciudad)
            .bind(&alerta.pais)
            .bind(Json(&alerta.detalles))
            .bind(alerta.fecha)
            .bind(&alerta.fuente)
            .bind(alerta.estado.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!(
                "no existe la alerta {}",
                alerta.id
            )));
        }
        Ok(alerta)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let result = sqlx::query(queries::DELETE_ALERT)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
