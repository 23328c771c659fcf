use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use clima_alerts::aggregator::Aggregator;
use clima_alerts::http::{router, AppState};
use clima_alerts::measurements::MeasurementLookup;
use clima_alerts::repository::memory::MemoryAlertRepository;
use clima_alerts::service::AlertService;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Lookup double: answers from a fixed map, so missing sensors behave like
/// an unreachable measurement service.
#[derive(Default)]
struct FakeLookup {
    mediciones: HashMap<Uuid, Value>,
}

#[async_trait]
impl MeasurementLookup for FakeLookup {
    async fn latest_measurement(&self, sensor_id: Uuid) -> Option<Value> {
        self.mediciones.get(&sensor_id).cloned()
    }
}

fn app_with_lookup(lookup: FakeLookup) -> Router {
    let service = AlertService::new(Arc::new(MemoryAlertRepository::new()));
    let aggregator = Aggregator::new(service.clone(), Arc::new(lookup), 4);
    router(AppState::new(service, aggregator))
}

fn app() -> Router {
    app_with_lookup(FakeLookup::default())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put(uri: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn create_assigns_id_fecha_and_defaults() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/alerts",
            json!({ "tipo": "climatica", "ciudad": "Rosario", "pais": "Argentina" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert_eq!(body["estado"], "ACTIVA");
    assert_eq!(body["descripcion"], "Alerta generada");
    assert_eq!(body["ciudad"], "Rosario");
    assert!(!body["fecha"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_malformed_sensor_id_is_a_client_error() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json("/alerts", json!({ "sensorId": "definitivamente-no" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body["detalle"].as_str().unwrap().contains("definitivamente-no"));
}

#[tokio::test]
async fn unparsable_json_body_gets_a_structured_error() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/alerts")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body["detalle"].is_string());
}

#[tokio::test]
async fn missing_location_params_get_a_structured_error() {
    let app = app();
    let (status, body) = send(&app, get("/alerts/by-location")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body["detalle"].is_string());
}

#[tokio::test]
async fn non_uuid_path_segment_gets_a_structured_error() {
    let app = app();
    let (status, body) = send(&app, put("/alerts/no-es-un-uuid/resolve")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body["detalle"].is_string());
}

#[tokio::test]
async fn active_and_resolved_listings_split_by_state() {
    let app = app();
    let (_, primera) = send(&app, post_json("/alerts", json!({}))).await;
    let (_, segunda) = send(&app, post_json("/alerts", json!({}))).await;

    let resolve_uri = format!("/alerts/{}/resolve", segunda["id"].as_str().unwrap());
    let (status, resuelta) = send(&app, put(&resolve_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resuelta["estado"], "RESUELTA");

    let (status, activas) = send(&app, get("/alerts/active")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(activas.as_array().unwrap().len(), 1);
    assert_eq!(activas[0]["id"], primera["id"]);

    let (status, resueltas) = send(&app, get("/alerts/resolved")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resueltas.as_array().unwrap().len(), 1);
    assert_eq!(resueltas[0]["id"], segunda["id"]);
}

#[tokio::test]
async fn resolving_an_unknown_alert_is_not_found() {
    let app = app();
    let uri = format!("/alerts/{}/resolve", Uuid::new_v4());
    let (status, body) = send(&app, put(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    assert!(body["detalle"].is_string());
}

#[tokio::test]
async fn deleting_works_once_and_then_is_not_found() {
    let app = app();
    let (_, alerta) = send(&app, post_json("/alerts", json!({}))).await;
    let uri = format!("/alerts/{}", alerta["id"].as_str().unwrap());

    let (status, body) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Alerta eliminada correctamente");

    let (status, body) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unfiltered_empty_store_is_an_empty_list_not_no_content() {
    let app = app();
    let (status, body) = send(&app, get("/alerts/filter")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, get("/alerts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn filter_that_matches_nothing_is_no_content() {
    let app = app();
    send(&app, post_json("/alerts", json!({ "ciudad": "Rosario" }))).await;

    let (status, _) = send(&app, get("/alerts/filter?ciudad=Montevideo")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn filter_returns_exact_matches() {
    let app = app();
    let (_, esperada) = send(
        &app,
        post_json(
            "/alerts",
            json!({ "tipo": "climatica", "ciudad": "Rosario" }),
        ),
    )
    .await;
    send(
        &app,
        post_json(
            "/alerts",
            json!({ "tipo": "climatica", "ciudad": "Cordoba" }),
        ),
    )
    .await;

    let (status, body) = send(&app, get("/alerts/filter?tipo=climatica&ciudad=Rosario")).await;
    assert_eq!(status, StatusCode::OK);
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["id"], esperada["id"]);
}

#[tokio::test]
async fn by_location_is_no_content_when_nothing_matches() {
    let app = app();
    send(
        &app,
        post_json("/alerts", json!({ "ciudad": "Rosario", "pais": "Argentina" })),
    )
    .await;

    let (status, body) = send(&app, get("/alerts/by-location?ciudad=Rosario&pais=Argentina")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/alerts/by-location?ciudad=Rosario&pais=Uruguay")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn global_view_keeps_every_alert_when_upstream_is_down() {
    // Default FakeLookup answers None for every sensor.
    let app = app();
    let sensor_id = Uuid::new_v4();
    send(
        &app,
        post_json("/alerts", json!({ "sensorId": sensor_id.to_string() })),
    )
    .await;
    send(&app, post_json("/alerts", json!({}))).await;

    let (status, body) = send(&app, get("/alerts/global")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["ultimaMedicion"], "No disponible");
    }
}

#[tokio::test]
async fn global_view_carries_the_measurement_payload() {
    let sensor_id = Uuid::new_v4();
    let lookup = FakeLookup {
        mediciones: HashMap::from([(sensor_id, json!({ "temperatura": 33.1 }))]),
    };
    let app = app_with_lookup(lookup);

    send(
        &app,
        post_json(
            "/alerts",
            json!({
                "sensorId": sensor_id.to_string(),
                "ciudad": "Rosario",
                "pais": "Argentina",
            }),
        ),
    )
    .await;

    let (status, body) = send(&app, get("/alerts/global")).await;
    assert_eq!(status, StatusCode::OK);
    let item = &body.as_array().unwrap()[0];
    assert_eq!(item["sensorId"], sensor_id.to_string());
    assert_eq!(item["ciudad"], "Rosario");
    assert_eq!(item["estado"], "ACTIVA");
    assert_eq!(item["ultimaMedicion"], json!({ "temperatura": 33.1 }));
    assert!(item["fechaAlerta"].is_string());
}
