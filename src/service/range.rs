//! Calendar ranges for day/week/month queries

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::types::{CalendarError, CalendarResult};
use crate::validation::ValidationError;

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `[date, date + 1 day)`
    pub fn day(date: NaiveDate) -> CalendarResult<Self> {
        Self::spanning_days(date, 1)
    }

    /// `[date, date + 7 days)`
    pub fn week(date: NaiveDate) -> CalendarResult<Self> {
        Self::spanning_days(date, 7)
    }

    /// `[first of month, first of next month)`
    pub fn month(date: NaiveDate) -> CalendarResult<Self> {
        let start = date.with_day(1).ok_or_else(|| out_of_range(date))?;
        let end = start.checked_add_months(Months::new(1)).ok_or_else(|| out_of_range(date))?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    fn spanning_days(start: NaiveDate, days: u64) -> CalendarResult<Self> {
        let end = start.checked_add_days(Days::new(days)).ok_or_else(|| out_of_range(start))?;
        Ok(Self { start, end })
    }
}

fn out_of_range(date: NaiveDate) -> CalendarError {
    ValidationError::InvalidDate(date).into()
}
