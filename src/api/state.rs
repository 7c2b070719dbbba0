//! Shared handler state

use crate::logging::Logger;
use crate::service::EventService;
use crate::types::{Event, ReminderTask};
use crate::workers::ReminderQueue;

/// Shared application state for request handlers
pub struct AppState {
    /// Validating façade over the event store
    pub service: EventService,

    /// Producer side of the reminder scheduler
    pub reminders: ReminderQueue,

    pub logger: Logger,
}

impl AppState {
    pub fn new(service: EventService, reminders: ReminderQueue, logger: Logger) -> Self {
        Self {
            service,
            reminders,
            logger,
        }
    }

    /// Queue the event's reminder, if it has one. Best-effort: a full queue
    /// drops the task and logs, the request still succeeds.
    pub fn schedule_reminder(&self, event: &Event) {
        if let Some(task) = ReminderTask::for_event(event) {
            self.reminders.enqueue(task);
        }
    }
}
