use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy for the alert service.
///
/// Upstream measurement unavailability is intentionally absent: it is never
/// surfaced as a request failure, only degraded into a per-item placeholder
/// (see `models::global::UltimaMedicion`).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input, e.g. an unparsable `sensorId`.
    #[error("{0}")]
    Validation(String),
    /// Unknown alert identifier on resolve/delete.
    #[error("{0}")]
    NotFound(String),
    /// Unexpected failure while reading, writing or merging alerts.
    #[error("{0}")]
    Internal(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, titulo) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "Solicitud inválida"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Alerta no encontrada"),
            Self::Internal(detalle) => {
                error!("internal error: {}", detalle);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor")
            }
        };
        let body = Json(json!({ "error": titulo, "detalle": self.to_string() }));
        (status, body).into_response()
    }
}
