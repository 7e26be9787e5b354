use crate::cli::ServeArgs;
use crate::infra::{AppState, Portal};
use crate::routes::with_portal_routes;
use crate::seed::seed_demo_data;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use lingua_portal::config::AppConfig;
use lingua_portal::error::AppError;
use lingua_portal::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let portal = Portal::in_memory(&config.leads)?;
    if config.leads.url.is_none() {
        warn!("LEAD_WEBHOOK_URL not set; captured leads are only recorded locally");
    }
    if config.seed_demo_data {
        seed_demo_data(&portal, Local::now().date_naive())?;
    }

    let app = with_portal_routes(&portal)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seeded = config.seed_demo_data, "lingua portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
