//! Field validation for calendar events

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use thiserror::Error;

use crate::types::Event;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest and latest years a calendar date may carry (four-digit years only)
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Validation failures on event fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid user id")]
    EmptyUserId,

    #[error("invalid event text")]
    EmptyText,

    #[error("invalid date: {0}")]
    InvalidDate(NaiveDate),

    #[error("invalid date format '{0}', use YYYY-MM-DD")]
    MalformedDate(String),

    #[error("invalid reminder time format '{0}', use RFC3339")]
    MalformedReminderTime(String),
}

/// Check the invariants every stored event must satisfy
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    if event.user_id.trim().is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    if event.text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    validate_date(event.date)
}

pub fn validate_date(date: NaiveDate) -> Result<(), ValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDate(date))
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::MalformedDate(raw.to_string()))?;
    validate_date(date)?;
    Ok(date)
}

/// Parse an optional RFC3339 reminder instant; empty input means "no reminder"
pub fn parse_reminder_time(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(|_| ValidationError::MalformedReminderTime(value.to_string())),
    }
}
