use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::catalog::{EventCatalog, EventQuery, EventService};

pub fn event_router<C>(service: Arc<EventService<C>>) -> Router
where
    C: EventCatalog + 'static,
{
    Router::new()
        .route("/api/events", get(list_handler::<C>))
        .with_state(service)
}

async fn list_handler<C>(
    State(service): State<Arc<EventService<C>>>,
    Query(query): Query<EventQuery>,
) -> Response
where
    C: EventCatalog + 'static,
{
    match service.list(&query) {
        Ok(events) => Json(events).into_response(),
        Err(err) => err.into_response(),
    }
}
