use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::{ConsultationId, ConsultationQuery, ConsultationUpdate, NewConsultation};
use super::repository::ConsultationRepository;
use super::service::{ConsultationError, ConsultationService};
use crate::error::error_response;
use crate::workflows::store::RepositoryError;

impl IntoResponse for ConsultationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConsultationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConsultationError::NotFound(_) => StatusCode::NOT_FOUND,
            ConsultationError::InvalidStatus { .. }
            | ConsultationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ConsultationError::Export(_) | ConsultationError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error_response(status, self)
    }
}

pub fn consultation_router<R>(service: Arc<ConsultationService<R>>) -> Router
where
    R: ConsultationRepository + 'static,
{
    Router::new()
        .route(
            "/api/consultations",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/consultations/export", get(export_handler::<R>))
        .route("/api/consultations/summary", get(summary_handler::<R>))
        .route(
            "/api/consultations/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Query(query): Query<ConsultationQuery>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    Ok(Json(service.list(&query)?).into_response())
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Json(input): Json<NewConsultation>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    let record = service.create(input)?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Query(query): Query<ConsultationQuery>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    let body = service.export_csv(&query)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"consultations.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    Ok(Json(service.summary()?).into_response())
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Path(id): Path<String>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    Ok(Json(service.get(&ConsultationId(id))?).into_response())
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Path(id): Path<String>,
    Json(update): Json<ConsultationUpdate>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    Ok(Json(service.update(&ConsultationId(id), update)?).into_response())
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Path(id): Path<String>,
) -> Result<Response, ConsultationError>
where
    R: ConsultationRepository + 'static,
{
    service.delete(&ConsultationId(id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
