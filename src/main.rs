use std::sync::Arc;
use std::time::Duration;

use clima_alerts::aggregator::Aggregator;
use clima_alerts::config::AppConfig;
use clima_alerts::db;
use clima_alerts::http::{self, AppState};
use clima_alerts::measurements::HttpMeasurementClient;
use clima_alerts::repository::pg::PgAlertRepository;
use clima_alerts::service::AlertService;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting Clima Alerts Service...");

    // Init DB
    let pool = db::init_pool(&config.database_url).await?;
    info!("Connected to database");

    let repo = Arc::new(PgAlertRepository::new(pool));
    let lookup = Arc::new(HttpMeasurementClient::new(
        config.measurement_service_url.clone(),
        Duration::from_millis(config.measurement_timeout_ms),
    )?);

    let service = AlertService::new(repo);
    let aggregator = Aggregator::new(service.clone(), lookup, config.measurement_concurrency);
    let app = http::router(AppState::new(service, aggregator));

    let listener = tokio::net::TcpListener::bind(&config.http_bind_addr).await?;
    info!("Listening on {}", config.http_bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
