use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::store::{MemoryStore, RepositoryError};

/// Public workshop, salon or trial class listed on the events page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub category: String,
    pub language: String,
    pub level: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub location: String,
    pub capacity: u32,
    pub registered: u32,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub seats_remaining: u32,
    pub sold_out: bool,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        let seats_remaining = event.capacity.saturating_sub(event.registered);
        Self {
            event,
            seats_remaining,
            sold_out: seats_remaining == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSort {
    #[default]
    Start,
    Price,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    pub category: Option<String>,
    pub language: Option<String>,
    pub upcoming_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sort: EventSort,
}

pub trait EventCatalog: Send + Sync {
    fn all(&self) -> Result<Vec<Event>, RepositoryError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryEventCatalog {
    events: MemoryStore<String, Event>,
}

impl InMemoryEventCatalog {
    pub fn add(&self, event: Event) -> Result<Event, RepositoryError> {
        self.events.insert_new(event.id.clone(), event)
    }
}

impl EventCatalog for InMemoryEventCatalog {
    fn all(&self) -> Result<Vec<Event>, RepositoryError> {
        self.events.values()
    }
}

pub struct EventService<C> {
    catalog: Arc<C>,
}

impl<C> EventService<C>
where
    C: EventCatalog + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    /// Category and language match case-insensitively.
    pub fn list(&self, query: &EventQuery) -> Result<Vec<EventView>, RepositoryError> {
        let same = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |wanted| wanted.trim().eq_ignore_ascii_case(actual))
        };

        let mut events: Vec<Event> = self
            .catalog
            .all()?
            .into_iter()
            .filter(|event| same(&query.category, &event.category))
            .filter(|event| same(&query.language, &event.language))
            .filter(|event| query.upcoming_after.map_or(true, |after| event.starts_at >= after))
            .collect();

        match query.sort {
            EventSort::Start => events.sort_by(|a, b| {
                a.starts_at
                    .cmp(&b.starts_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            EventSort::Price => events.sort_by(|a, b| {
                a.price
                    .cmp(&b.price)
                    .then_with(|| a.starts_at.cmp(&b.starts_at))
            }),
        }

        Ok(events.into_iter().map(EventView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, language: &str, day: u32, price: i64, registered: u32) -> Event {
        Event {
            id: id.to_string(),
            title: format!("{language} salon"),
            category: "workshop".to_string(),
            language: language.to_string(),
            level: "intermediate".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 4, day, 19, 0, 0).unwrap(),
            duration_minutes: 90,
            location: "Taipei Main".to_string(),
            capacity: 12,
            registered,
            price,
        }
    }

    fn service() -> EventService<InMemoryEventCatalog> {
        let catalog = InMemoryEventCatalog::default();
        catalog.add(event("evt-1", "English", 10, 800, 3)).unwrap();
        catalog.add(event("evt-2", "Japanese", 5, 1200, 12)).unwrap();
        catalog.add(event("evt-3", "English", 20, 0, 15)).unwrap();
        EventService::new(Arc::new(catalog))
    }

    #[test]
    fn default_sort_is_by_start_time() {
        let ids: Vec<String> = service()
            .list(&EventQuery::default())
            .unwrap()
            .into_iter()
            .map(|view| view.event.id)
            .collect();
        assert_eq!(ids, ["evt-2", "evt-1", "evt-3"]);
    }

    #[test]
    fn filters_by_language_and_start() {
        let views = service()
            .list(&EventQuery {
                language: Some("english".to_string()),
                upcoming_after: Some(Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap()),
                sort: EventSort::Price,
                ..EventQuery::default()
            })
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].event.id, "evt-3");
    }

    #[test]
    fn overbooked_events_report_zero_seats() {
        let views = service()
            .list(&EventQuery {
                sort: EventSort::Price,
                ..EventQuery::default()
            })
            .unwrap();

        let free = &views[0];
        assert_eq!(free.event.id, "evt-3");
        assert_eq!(free.seats_remaining, 0);
        assert!(free.sold_out);

        let open = views.iter().find(|view| view.event.id == "evt-1").unwrap();
        assert_eq!(open.seats_remaining, 9);
        assert!(!open.sold_out);
    }
}
