use crate::infra::{AppState, Portal};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use lingua_portal::workflows::consultations::consultation_router;
use lingua_portal::workflows::events::event_router;
use lingua_portal::workflows::leads::lead_router;
use lingua_portal::workflows::membership::plan_router;
use lingua_portal::workflows::scheduling::{cancellation_router, leave_router};
use serde_json::json;
use std::sync::atomic::Ordering;

/// All workflow routers plus the operational endpoints.
pub(crate) fn with_portal_routes(portal: &Portal) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(leave_router(portal.leaves.clone()))
        .merge(cancellation_router(portal.cancellations.clone()))
        .merge(consultation_router(portal.consultations.clone()))
        .merge(lead_router(portal.leads.clone()))
        .merge(plan_router(portal.plans.clone()))
        .merge(event_router(portal.events.clone()))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
