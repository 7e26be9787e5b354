use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::domain::LeadSubmission;
use super::service::{LeadCaptureService, LeadError};
use super::webhook::LeadWebhook;
use crate::error::error_response;
use crate::workflows::consultations::ConsultationRepository;

impl IntoResponse for LeadError {
    fn into_response(self) -> Response {
        match self {
            LeadError::Validation(_) => error_response(StatusCode::UNPROCESSABLE_ENTITY, self),
            LeadError::Webhook(_) => error_response(StatusCode::BAD_GATEWAY, self),
            LeadError::Consultation(err) => err.into_response(),
        }
    }
}

pub fn lead_router<W, R>(service: Arc<LeadCaptureService<W, R>>) -> Router
where
    W: LeadWebhook + 'static,
    R: ConsultationRepository + 'static,
{
    Router::new()
        .route("/api/leads", post(capture_handler::<W, R>))
        .with_state(service)
}

pub(crate) async fn capture_handler<W, R>(
    State(service): State<Arc<LeadCaptureService<W, R>>>,
    Json(lead): Json<LeadSubmission>,
) -> Response
where
    W: LeadWebhook + 'static,
    R: ConsultationRepository + 'static,
{
    match service.capture(lead).await {
        Ok(receipt) => (StatusCode::ACCEPTED, Json(receipt)).into_response(),
        Err(err) => err.into_response(),
    }
}
