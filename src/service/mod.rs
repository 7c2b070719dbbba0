//! Event Service - validating façade over the event store
//!
//! Builds and validates [`Event`] records before delegating to an
//! [`EventRepository`], and turns day/week/month requests into date ranges.

mod crud;
mod query;
mod range;

pub use range::DateRange;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::event_store::{EventRepository, InMemoryEventStore};
use crate::types::{CalendarResult, Event};

/// Service façade used by the request layer
#[derive(Clone)]
pub struct EventService {
    pub(crate) store: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventRepository>) -> Self {
        Self { store }
    }

    /// Service backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEventStore::new()))
    }

    /// The backing store, shared with background workers
    pub fn store(&self) -> Arc<dyn EventRepository> {
        self.store.clone()
    }
}

// Operations are implemented in submodules
impl EventService {
    // CRUD operations (from crud.rs)
    pub fn create_event(
        &self,
        user_id: &str,
        text: &str,
        date: NaiveDate,
        reminder_at: Option<DateTime<Utc>>,
    ) -> CalendarResult<Event> {
        crud::create_event(self, user_id, text, date, reminder_at)
    }

    pub fn update_event(
        &self,
        user_id: &str,
        event_id: &str,
        text: &str,
        date: NaiveDate,
        reminder_at: Option<DateTime<Utc>>,
    ) -> CalendarResult<Event> {
        crud::update_event(self, user_id, event_id, text, date, reminder_at)
    }

    pub fn delete_event(&self, user_id: &str, event_id: &str) -> CalendarResult<()> {
        crud::delete_event(self, user_id, event_id)
    }

    pub fn get_event(&self, user_id: &str, event_id: &str) -> CalendarResult<Event> {
        crud::get_event(self, user_id, event_id)
    }

    // Query operations (from query.rs)
    pub fn events_for_day(&self, user_id: &str, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        query::events_in(self, user_id, DateRange::day(date)?)
    }

    pub fn events_for_week(&self, user_id: &str, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        query::events_in(self, user_id, DateRange::week(date)?)
    }

    pub fn events_for_month(&self, user_id: &str, date: NaiveDate) -> CalendarResult<Vec<Event>> {
        query::events_in(self, user_id, DateRange::month(date)?)
    }

    pub fn active_events(&self, user_id: &str) -> CalendarResult<Vec<Event>> {
        query::active_events(self, user_id)
    }
}
