use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::{MemberCardPlan, NewPlan, PlanId, PlanQuery, PlanUpdate};
use super::repository::PlanRepository;
use super::service::{PlanError, PlanService};
use crate::error::error_response;

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        match self {
            PlanError::Validation(_) => error_response(StatusCode::UNPROCESSABLE_ENTITY, self),
            PlanError::NotFound(_) => error_response(StatusCode::NOT_FOUND, self),
            PlanError::Repository(err) => err.into_response(),
        }
    }
}

pub fn plan_router<R>(service: Arc<PlanService<R>>) -> Router
where
    R: PlanRepository + 'static,
{
    Router::new()
        .route(
            "/api/member-card-plans",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/member-card-plans/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

async fn list_handler<R>(
    State(service): State<Arc<PlanService<R>>>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<Vec<MemberCardPlan>>, PlanError>
where
    R: PlanRepository + 'static,
{
    service.list(&query).map(Json)
}

async fn create_handler<R>(
    State(service): State<Arc<PlanService<R>>>,
    Json(input): Json<NewPlan>,
) -> Result<Response, PlanError>
where
    R: PlanRepository + 'static,
{
    let plan = service.create(input)?;
    Ok((StatusCode::CREATED, Json(plan)).into_response())
}

async fn get_handler<R>(
    State(service): State<Arc<PlanService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<MemberCardPlan>, PlanError>
where
    R: PlanRepository + 'static,
{
    service.get(&PlanId(id)).map(Json)
}

async fn update_handler<R>(
    State(service): State<Arc<PlanService<R>>>,
    Path(id): Path<String>,
    Json(update): Json<PlanUpdate>,
) -> Result<Json<MemberCardPlan>, PlanError>
where
    R: PlanRepository + 'static,
{
    service.update(&PlanId(id), update).map(Json)
}

async fn delete_handler<R>(
    State(service): State<Arc<PlanService<R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, PlanError>
where
    R: PlanRepository + 'static,
{
    service.delete(&PlanId(id))?;
    Ok(StatusCode::NO_CONTENT)
}
