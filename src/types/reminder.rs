//! Reminder task handed to the scheduler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Event;

/// An in-flight request to notify a user about an event at `target`.
///
/// Tasks only live inside the reminder scheduler; they are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTask {
    pub event_id: String,
    pub user_id: String,
    pub text: String,
    pub target: DateTime<Utc>,
}

impl ReminderTask {
    pub fn new(
        event_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
        target: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            user_id: user_id.into(),
            text: text.into(),
            target,
        }
    }

    /// Build a task from an event, if the event carries a reminder
    pub fn for_event(event: &Event) -> Option<Self> {
        event.reminder_at.map(|target| Self {
            event_id: event.id.clone(),
            user_id: event.user_id.clone(),
            text: event.text.clone(),
            target,
        })
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.target <= now
    }
}
