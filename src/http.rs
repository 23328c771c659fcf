use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::error::ServiceError;
use crate::models::alert::{Alerta, EstadoAlerta, NuevaAlerta};
use crate::models::filter::AlertFilter;
use crate::models::global::AlertaGlobal;
use crate::service::AlertService;

#[derive(Clone)]
pub struct AppState {
    pub service: AlertService,
    pub aggregator: Aggregator,
}

impl AppState {
    pub fn new(service: AlertService, aggregator: Aggregator) -> Self {
        Self { service, aggregator }
    }
}

/// Extractor wrappers whose rejections are `ServiceError::Validation`, so a
/// malformed body, query string or path segment gets the same
/// `{error, detalle}` payload as any other client error instead of axum's
/// plain-text default.
struct ValidatedJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServiceError::Validation(rejection.body_text())),
        }
    }
}

struct ValidatedQuery<T>(T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServiceError::Validation(rejection.body_text())),
        }
    }
}

struct ValidatedPath<T>(T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServiceError::Validation(rejection.body_text())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/active", get(list_active))
        .route("/alerts/resolved", get(list_resolved))
        .route("/alerts/by-location", get(by_location))
        .route("/alerts/filter", get(filter_alerts))
        .route("/alerts/global", get(global_alerts))
        .route("/alerts/:id/resolve", put(resolve_alert))
        .route("/alerts/:id", delete(delete_alert))
        .with_state(state)
}

async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<Alerta>>, ServiceError> {
    Ok(Json(state.service.list().await?))
}

async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Alerta>>, ServiceError> {
    Ok(Json(state.service.list_by_estado(EstadoAlerta::Activa).await?))
}

async fn list_resolved(State(state): State<AppState>) -> Result<Json<Vec<Alerta>>, ServiceError> {
    Ok(Json(
        state.service.list_by_estado(EstadoAlerta::Resuelta).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct UbicacionParams {
    ciudad: String,
    pais: String,
}

async fn by_location(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<UbicacionParams>,
) -> Result<Response, ServiceError> {
    let alertas = state
        .service
        .find_by_location(params.ciudad, params.pais)
        .await?;
    if alertas.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(alertas).into_response())
}

/// Dynamic multi-field filter. An empty filter is "list all", so an empty
/// store yields 200 with an empty list; 204 is reserved for a non-empty
/// filter that matched nothing.
async fn filter_alerts(
    State(state): State<AppState>,
    ValidatedQuery(filtro): ValidatedQuery<AlertFilter>,
) -> Result<Response, ServiceError> {
    let alertas = state.service.filter(&filtro).await?;
    if alertas.is_empty() && !filtro.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(alertas).into_response())
}

async fn create_alert(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NuevaAlerta>,
) -> Result<(StatusCode, Json<Alerta>), ServiceError> {
    let alerta = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(alerta)))
}

async fn resolve_alert(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Alerta>, ServiceError> {
    Ok(Json(state.service.resolve(id).await?))
}

async fn delete_alert(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    state.service.delete(id).await?;
    Ok(Json(json!({ "mensaje": "Alerta eliminada correctamente" })))
}

async fn global_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertaGlobal>>, ServiceError> {
    Ok(Json(state.aggregator.global_view().await?))
}
