//! Data types for the Event Calendar service
//!
//! This module contains the core records and error types used throughout the application.

mod error;
mod event;
mod reminder;

pub use error::{CalendarError, NotifyError, ShutdownError};
pub use event::Event;
pub use reminder::ReminderTask;

/// Result type for store and service operations
pub type CalendarResult<T> = Result<T, CalendarError>;
