pub mod catalog;
pub mod router;

pub use catalog::{
    Event, EventCatalog, EventQuery, EventService, EventSort, EventView, InMemoryEventCatalog,
};
pub use router::event_router;
