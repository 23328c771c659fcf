use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Fetches the most recent measurement for a sensor. Returns `None` whenever
/// the measurement cannot be obtained; unavailability is data here, never an
/// error the caller has to handle.
#[async_trait]
pub trait MeasurementLookup: Send + Sync {
    async fn latest_measurement(&self, sensor_id: Uuid) -> Option<Value>;
}

/// HTTP client against the remote measurement service. The service is
/// independently owned and may be slow or down, so every call is bounded by
/// `timeout` and any failure degrades to `None`. No retries.
pub struct HttpMeasurementClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpMeasurementClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn sensor_url(&self, sensor_id: Uuid) -> String {
        format!("{}/api/mediciones/sensor/{}", self.base_url, sensor_id)
    }

    async fn fetch(&self, sensor_id: Uuid) -> Option<Value> {
        let url = self.sensor_url(sensor_id);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("measurement service unreachable for sensor {}: {}", sensor_id, e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(
                "measurement service returned {} for sensor {}",
                response.status(),
                sensor_id
            );
            return None;
        }
        let mediciones: Vec<Value> = match response.json().await {
            Ok(m) => m,
            Err(e) => {
                warn!("invalid measurement payload for sensor {}: {}", sensor_id, e);
                return None;
            }
        };
        // The remote store is append-only; the last element is the latest.
        mediciones.into_iter().next_back()
    }
}

#[async_trait]
impl MeasurementLookup for HttpMeasurementClient {
    async fn latest_measurement(&self, sensor_id: Uuid) -> Option<Value> {
        match tokio::time::timeout(self.timeout, self.fetch(sensor_id)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("measurement lookup timed out for sensor {}", sensor_id);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> HttpMeasurementClient {
        HttpMeasurementClient::new(base_url, Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn picks_the_last_measurement() {
        let app = Router::new().route(
            "/api/mediciones/sensor/:id",
            get(|Path(_id): Path<Uuid>| async {
                Json(json!([
                    { "temperatura": 20.0 },
                    { "temperatura": 25.5 },
                ]))
            }),
        );
        let base = spawn_server(app).await;

        let result = client(base)
            .latest_measurement(Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(result, json!({ "temperatura": 25.5 }));
    }

    #[tokio::test]
    async fn empty_sequence_is_unavailable() {
        let app = Router::new().route(
            "/api/mediciones/sensor/:id",
            get(|| async { Json(json!([])) }),
        );
        let base = spawn_server(app).await;

        assert!(client(base).latest_measurement(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn upstream_error_is_unavailable() {
        let app = Router::new().route(
            "/api/mediciones/sensor/:id",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_server(app).await;

        assert!(client(base).latest_measurement(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        // Bind and drop a listener so the port is (very likely) closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let c = client(format!("http://{}", addr));
        assert!(c.latest_measurement(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn slow_upstream_times_out_to_unavailable() {
        let app = Router::new().route(
            "/api/mediciones/sensor/:id",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([{ "temperatura": 1.0 }]))
            }),
        );
        let base = spawn_server(app).await;

        let c = HttpMeasurementClient::new(base, Duration::from_millis(100)).unwrap();
        assert!(c.latest_measurement(Uuid::new_v4()).await.is_none());
    }
}
