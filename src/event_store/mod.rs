//! Event Store
//!
//! The store owns every [`Event`] record. Callers get copies back; all
//! mutation goes through the guarded operations below.
//!
//! # Locking
//!
//! ```text
//! reads  (get_by_id, get_by_date_range, get_all_active) ──► shared lock
//! writes (create, update, delete, archive_older_than)   ──► exclusive lock
//! ```
//!
//! No operation performs I/O or waits on anything but the store lock.

mod memory;

pub use memory::InMemoryEventStore;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{CalendarResult, Event};

/// Storage capability used by the service façade and the archival worker.
///
/// Implementations must make every operation atomic with respect to the
/// others. A persistent backend may additionally return
/// [`CalendarError::StorageFailure`](crate::types::CalendarError::StorageFailure).
pub trait EventRepository: Send + Sync {
    /// Insert a new record; fails with `AlreadyExists` if `(user_id, id)` is taken
    fn create(&self, event: Event) -> CalendarResult<()>;

    /// Replace an existing record; fails with `NotFound` if the key is absent
    fn update(&self, event: Event) -> CalendarResult<()>;

    fn delete(&self, user_id: &str, event_id: &str) -> CalendarResult<()>;

    fn get_by_id(&self, user_id: &str, event_id: &str) -> CalendarResult<Event>;

    /// Non-archived events of `user_id` with `start <= date < end`, unordered
    fn get_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<Event>>;

    fn get_all_active(&self, user_id: &str) -> CalendarResult<Vec<Event>>;

    /// Mark every non-archived event dated before `cutoff` as archived, across
    /// all users. Returns the number of events newly archived.
    fn archive_older_than(&self, cutoff: DateTime<Utc>) -> CalendarResult<usize>;
}
