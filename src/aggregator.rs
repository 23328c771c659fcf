use std::sync::Arc;

use futures::{stream, StreamExt};
use tracing::debug;

use crate::error::ServiceError;
use crate::measurements::MeasurementLookup;
use crate::models::global::{AlertaGlobal, UltimaMedicion};
use crate::service::AlertService;

/// Builds the global view: every alert enriched with its sensor's latest
/// measurement. Enrichment is best effort; a failed lookup degrades only
/// that item, and only a failure to list the alerts fails the batch.
#[derive(Clone)]
pub struct Aggregator {
    service: AlertService,
    lookup: Arc<dyn MeasurementLookup>,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(
        service: AlertService,
        lookup: Arc<dyn MeasurementLookup>,
        concurrency: usize,
    ) -> Self {
        Self {
            service,
            lookup,
            concurrency: concurrency.max(1),
        }
    }

    /// Lists the alerts and fans out one lookup per alert with bounded
    /// concurrency. `buffered` keeps the output in listing order, so no
    /// re-sorting is needed; dropping the returned future cancels in-flight
    /// lookups without touching completed items.
    pub async fn global_view(&self) -> Result<Vec<AlertaGlobal>, ServiceError> {
        let alertas = self.service.list().await?;
        debug!("Building global view for {} alerts", alertas.len());

        let enriched = stream::iter(alertas)
            .map(|alerta| {
                let lookup = Arc::clone(&self.lookup);
                async move {
                    let ultima_medicion = match alerta.sensor_id {
                        // No sensor reference: unavailable without a lookup.
                        None => UltimaMedicion::NoDisponible,
                        Some(sensor_id) => match lookup.latest_measurement(sensor_id).await {
                            Some(medicion) => UltimaMedicion::Disponible(medicion),
                            None => UltimaMedicion::NoDisponible,
                        },
                    };
                    AlertaGlobal::from_alerta(&alerta, ultima_medicion)
                }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(enriched)
    }
}
