use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::alert::{Alerta, EstadoAlerta};
use crate::models::filter::AlertFilter;

pub mod memory;
pub mod pg;

/// Read/write access to the alert collection. Ordering of returned sequences
/// is store-defined unless a method documents otherwise; callers must not
/// assume insertion order is preserved across every read path.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn insert(&self, alerta: Alerta) -> Result<Alerta, ServiceError>;

    /// All alerts, ordered by `fecha` so the global view is stable.
    async fn find_all(&self) -> Result<Vec<Alerta>, ServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alerta>, ServiceError>;

    async fn find_by_filter(&self, filtro: &AlertFilter) -> Result<Vec<Alerta>, ServiceError>;

    async fn find_by_estado(&self, estado: EstadoAlerta) -> Result<Vec<Alerta>, ServiceError>;

    /// Replaces the stored record with the same `id`. `NotFound` if the
    /// record no longer exists.
    async fn update(&self, alerta: Alerta) -> Result<Alerta, ServiceError>;

    /// Returns whether a record was actually removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
