//! Utility functions and helpers
//!
//! Duration-string parsing for configuration and date helpers.

pub mod time;

pub use time::{format_duration, parse_duration, start_of_day_utc};
