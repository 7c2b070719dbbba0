//! In-memory event store
//!
//! All records live in one map guarded by a single reader/writer lock. The
//! archival sweep depends on that single critical section, so the map is not
//! sharded.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

use crate::types::{CalendarError, CalendarResult, Event};

use super::EventRepository;

/// Events keyed by user id, then by event id
type EventMap = HashMap<String, HashMap<String, Event>>;

/// Thread-safe in-memory implementation of [`EventRepository`]
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<EventMap>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored events, archived ones included
    pub fn len(&self) -> usize {
        self.events.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of archived events across all users
    pub fn archived_count(&self) -> usize {
        self.events
            .read()
            .values()
            .flat_map(HashMap::values)
            .filter(|e| e.archived)
            .count()
    }

    fn collect_active<F>(&self, user_id: &str, mut keep: F) -> Vec<Event>
    where
        F: FnMut(&Event) -> bool,
    {
        let events = self.events.read();
        match events.get(user_id) {
            Some(by_id) => by_id
                .values()
                .filter(|e| !e.archived && keep(e))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

impl EventRepository for InMemoryEventStore {
    fn create(&self, event: Event) -> CalendarResult<()> {
        let mut events = self.events.write();
        let by_id = events.entry(event.user_id.clone()).or_default();
        if by_id.contains_key(&event.id) {
            return Err(CalendarError::already_exists(&event.user_id, &event.id));
        }
        by_id.insert(event.id.clone(), event);
        Ok(())
    }

    fn update(&self, event: Event) -> CalendarResult<()> {
        let mut events = self.events.write();
        match events
            .get_mut(&event.user_id)
            .and_then(|by_id| by_id.get_mut(&event.id))
        {
            Some(slot) => {
                *slot = event;
                Ok(())
            }
            None => Err(CalendarError::not_found(&event.user_id, &event.id)),
        }
    }

    fn delete(&self, user_id: &str, event_id: &str) -> CalendarResult<()> {
        let mut events = self.events.write();
        let by_id = events
            .get_mut(user_id)
            .ok_or_else(|| CalendarError::not_found(user_id, event_id))?;
        if by_id.remove(event_id).is_none() {
            return Err(CalendarError::not_found(user_id, event_id));
        }
        if by_id.is_empty() {
            events.remove(user_id);
        }
        Ok(())
    }

    fn get_by_id(&self, user_id: &str, event_id: &str) -> CalendarResult<Event> {
        self.events
            .read()
            .get(user_id)
            .and_then(|by_id| by_id.get(event_id))
            .cloned()
            .ok_or_else(|| CalendarError::not_found(user_id, event_id))
    }

    fn get_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<Event>> {
        Ok(self.collect_active(user_id, |e| start <= e.date && e.date < end))
    }

    fn get_all_active(&self, user_id: &str) -> CalendarResult<Vec<Event>> {
        Ok(self.collect_active(user_id, |_| true))
    }

    fn archive_older_than(&self, cutoff: DateTime<Utc>) -> CalendarResult<usize> {
        let mut events = self.events.write();
        let mut archived = 0;
        for event in events.values_mut().flat_map(HashMap::values_mut) {
            if !event.archived && event.is_older_than(cutoff) {
                event.archived = true;
                archived += 1;
            }
        }
        Ok(archived)
    }
}
