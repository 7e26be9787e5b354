use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::cancellations::{
    CancellationError, CancellationQuery, CancellationService, ProcessCancellation,
};
use super::conflict::ConflictChecker;
use super::domain::{
    CancellationId, LeaveRequestId, NewLeaveRequest, NewStudentCancellation, TeachingCategory,
};
use super::repository::{CancellationRepository, LeaveRepository, TeacherDirectory};
use super::service::{
    AssignSubstitute, LeaveQuery, LeaveService, LeaveServiceError, ReviewInput, ReviewerNote,
};
use crate::error::error_response;
use crate::workflows::store::RepositoryError;

impl IntoResponse for LeaveServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            LeaveServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LeaveServiceError::NotFound(_) | LeaveServiceError::UnknownTeacher(_) => {
                StatusCode::NOT_FOUND
            }
            LeaveServiceError::IneligibleSubstitute { .. } | LeaveServiceError::Transition(_) => {
                StatusCode::CONFLICT
            }
            LeaveServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            LeaveServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self)
    }
}

impl IntoResponse for CancellationError {
    fn into_response(self) -> Response {
        let status = match &self {
            CancellationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CancellationError::NotFound(_) => StatusCode::NOT_FOUND,
            CancellationError::AlreadyProcessed(_) => StatusCode::CONFLICT,
            CancellationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self)
    }
}

/// Leave request, substitute and teacher directory endpoints.
pub fn leave_router<L, D, C>(service: Arc<LeaveService<L, D, C>>) -> Router
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    Router::new()
        .route(
            "/api/leave-requests",
            post(submit_handler::<L, D, C>).get(list_handler::<L, D, C>),
        )
        .route("/api/leave-requests/:id", get(get_handler::<L, D, C>))
        .route(
            "/api/leave-requests/:id/eligible-substitutes",
            get(eligible_handler::<L, D, C>),
        )
        .route(
            "/api/leave-requests/:id/review",
            post(review_handler::<L, D, C>),
        )
        .route(
            "/api/leave-requests/:id/assign",
            post(assign_handler::<L, D, C>),
        )
        .route(
            "/api/leave-requests/:id/reject",
            post(reject_handler::<L, D, C>),
        )
        .route(
            "/api/leave-requests/:id/cancel",
            post(cancel_handler::<L, D, C>),
        )
        .route("/api/teachers", get(teachers_handler::<L, D, C>))
        .with_state(service)
}

pub(crate) async fn submit_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Json(input): Json<NewLeaveRequest>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.submit(input) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Query(query): Query<LeaveQuery>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.list(&query) {
        Ok(records) => Json(records).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Path(id): Path<String>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.get(&LeaveRequestId(id)) {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn eligible_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Path(id): Path<String>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.eligible_substitutes(&LeaveRequestId(id)).await {
        Ok(eligible) => Json(eligible).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn review_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Path(id): Path<String>,
    Json(input): Json<ReviewInput>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.review(&LeaveRequestId(id), input).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn assign_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Path(id): Path<String>,
    Json(input): Json<AssignSubstitute>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.assign_substitute(&LeaveRequestId(id), input).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn reject_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Path(id): Path<String>,
    Json(input): Json<ReviewerNote>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.reject(&LeaveRequestId(id), input) {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn cancel_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Path(id): Path<String>,
    Json(input): Json<ReviewerNote>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    match service.cancel(&LeaveRequestId(id), input) {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TeacherQuery {
    category: Option<String>,
}

pub(crate) async fn teachers_handler<L, D, C>(
    State(service): State<Arc<LeaveService<L, D, C>>>,
    Query(query): Query<TeacherQuery>,
) -> Response
where
    L: LeaveRepository + 'static,
    D: TeacherDirectory + 'static,
    C: ConflictChecker + 'static,
{
    let category = match query.category.as_deref().filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => match TeachingCategory::parse(raw) {
            Some(category) => Some(category),
            None => {
                return error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("unknown teaching category '{raw}'"),
                )
            }
        },
        None => None,
    };

    match service.teachers(category) {
        Ok(teachers) => Json(teachers).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Student cancellation endpoints.
pub fn cancellation_router<R>(service: Arc<CancellationService<R>>) -> Router
where
    R: CancellationRepository + 'static,
{
    Router::new()
        .route(
            "/api/student-cancellations",
            post(submit_cancellation_handler::<R>).get(list_cancellations_handler::<R>),
        )
        .route(
            "/api/student-cancellations/:id/process",
            post(process_cancellation_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_cancellation_handler<R>(
    State(service): State<Arc<CancellationService<R>>>,
    Json(input): Json<NewStudentCancellation>,
) -> Response
where
    R: CancellationRepository + 'static,
{
    match service.submit(input) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_cancellations_handler<R>(
    State(service): State<Arc<CancellationService<R>>>,
    Query(query): Query<CancellationQuery>,
) -> Response
where
    R: CancellationRepository + 'static,
{
    match service.list(&query) {
        Ok(records) => Json(records).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn process_cancellation_handler<R>(
    State(service): State<Arc<CancellationService<R>>>,
    Path(id): Path<String>,
    body: Option<Json<ProcessCancellation>>,
) -> Response
where
    R: CancellationRepository + 'static,
{
    let input = body.map(|Json(input)| input).unwrap_or_default();
    match service.process(&CancellationId(id), input) {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}
