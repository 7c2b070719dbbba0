//! Calendar event record

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::start_of_day_utc;

/// A calendar event owned by a single user.
///
/// The `(user_id, id)` pair is the storage key. `date` carries no time of day;
/// `reminder_at` is an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Event {
    /// Create a new, non-archived event stamped with `now`
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        date: NaiveDate,
        text: impl Into<String>,
        reminder_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            date,
            text: text.into(),
            reminder_at,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    /// True when the event carries a reminder that is not in the future and
    /// the event has not been archived
    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        match self.reminder_at {
            Some(at) => at <= now && !self.archived,
            None => false,
        }
    }

    /// Midnight (UTC) at the start of the event's calendar date
    pub fn starts_at(&self) -> DateTime<Utc> {
        start_of_day_utc(self.date)
    }

    /// Whether a sweep with this cutoff would archive the event
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.starts_at() < cutoff
    }
}
