//! Error taxonomy shared by the store, the service façade and the API

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by store and service operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("event not found: {event_id} (user {user_id})")]
    NotFound { user_id: String, event_id: String },

    #[error("event already exists: {event_id} (user {user_id})")]
    AlreadyExists { user_id: String, event_id: String },

    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// Reserved for persistent backends; the in-memory store never returns it
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl CalendarError {
    pub fn not_found(user_id: &str, event_id: &str) -> Self {
        CalendarError::NotFound {
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
        }
    }

    pub fn already_exists(user_id: &str, event_id: &str) -> Self {
        CalendarError::AlreadyExists {
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CalendarError::NotFound { .. })
    }
}

/// Errors raised by a notification transport
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Errors raised while stopping the service
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("shutdown did not finish within {0:?}")]
    TimedOut(std::time::Duration),

    #[error("background task panicked: {0}")]
    WorkerPanicked(String),
}
