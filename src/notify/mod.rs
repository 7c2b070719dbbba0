//! Reminder delivery transports
//!
//! The scheduler only depends on [`NotificationSender`]'s succeed/fail
//! contract, so transports can be swapped without touching it.

use async_trait::async_trait;
use serde_json::json;

use crate::logging::Logger;
use crate::types::{NotifyError, ReminderTask};

/// Delivers a due reminder to its user
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_reminder(&self, task: &ReminderTask) -> Result<(), NotifyError>;
}

/// Writes reminders to the service log
pub struct ConsoleNotificationSender {
    logger: Logger,
}

impl ConsoleNotificationSender {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl NotificationSender for ConsoleNotificationSender {
    async fn send_reminder(&self, task: &ReminderTask) -> Result<(), NotifyError> {
        self.logger.info(
            format!("REMINDER: Event '{}' for user {}", task.text, task.user_id),
            json!({
                "event_id": task.event_id,
                "user_id": task.user_id,
                "time": task.target.to_rfc3339(),
            }),
        );
        Ok(())
    }
}
