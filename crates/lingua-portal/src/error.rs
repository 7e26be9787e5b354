use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::consultations::ConsultationError;
use crate::workflows::membership::PlanError;
use crate::workflows::scheduling::{CancellationError, LeaveServiceError};
use crate::workflows::store::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Errors surfaced by the binaries (server start-up, CLI commands, seeding).
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Storage(RepositoryError),
    Leave(LeaveServiceError),
    Cancellation(CancellationError),
    Consultation(ConsultationError),
    Plan(PlanError),
    Webhook(reqwest::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Leave(err) => write!(f, "leave workflow error: {}", err),
            AppError::Cancellation(err) => write!(f, "cancellation workflow error: {}", err),
            AppError::Consultation(err) => write!(f, "consultation error: {}", err),
            AppError::Plan(err) => write!(f, "membership plan error: {}", err),
            AppError::Webhook(err) => write!(f, "lead webhook client error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Leave(err) => Some(err),
            AppError::Cancellation(err) => Some(err),
            AppError::Consultation(err) => Some(err),
            AppError::Plan(err) => Some(err),
            AppError::Webhook(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Storage(err) => err.into_response(),
            AppError::Leave(err) => err.into_response(),
            AppError::Cancellation(err) => err.into_response(),
            AppError::Consultation(err) => err.into_response(),
            AppError::Plan(err) => err.into_response(),
            AppError::Webhook(_) => error_response(StatusCode::BAD_GATEWAY, self),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self)
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Storage(value)
    }
}

impl From<LeaveServiceError> for AppError {
    fn from(value: LeaveServiceError) -> Self {
        Self::Leave(value)
    }
}

impl From<CancellationError> for AppError {
    fn from(value: CancellationError) -> Self {
        Self::Cancellation(value)
    }
}

impl From<ConsultationError> for AppError {
    fn from(value: ConsultationError) -> Self {
        Self::Consultation(value)
    }
}

impl From<PlanError> for AppError {
    fn from(value: PlanError) -> Self {
        Self::Plan(value)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::Webhook(value)
    }
}

/// Uniform `{"error": ...}` body shared by every workflow router.
pub fn error_response(status: StatusCode, message: impl fmt::Display) -> Response {
    let body = Json(json!({ "error": message.to_string() }));
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scheduling::LeaveRequestId;

    #[test]
    fn app_error_reuses_workflow_status_codes() {
        let missing = AppError::from(LeaveServiceError::NotFound(LeaveRequestId(
            "leave-000042".to_string(),
        )));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let offline = AppError::from(RepositoryError::Unavailable("offline".to_string()));
        assert_eq!(
            offline.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
