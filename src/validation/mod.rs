//! Field validation for calendar events
//!
//! Events are checked before they reach the store; request values are parsed
//! into typed dates and instants here as well.

mod event;

pub use event::{
    parse_date, parse_reminder_time, validate_date, validate_event, ValidationError, DATE_FORMAT,
    MAX_YEAR, MIN_YEAR,
};
