use crate::error::{ApiError, Result};
use chrono::{Local, NaiveDate, TimeDelta};
use std::mem::replace;

/// Date format used for API query parameters: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated date range where the start date never falls after the
/// end date. Iterating yields each date from start through end
/// (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Build a range from two dates, rejecting an end date before the
    /// start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ApiError::InvalidDateRange(format!(
                "end date {} before start date {}",
                end, start
            )));
        }
        Ok(DateRange(start, end))
    }

    /// Parse a range from "YYYY-MM-DD" strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT)
            .map_err(|e| ApiError::InvalidDateRange(format!("{}: {}", start, e)))?;
        let end = NaiveDate::parse_from_str(end, DATE_FORMAT)
            .map_err(|e| ApiError::InvalidDateRange(format!("{}: {}", end, e)))?;
        DateRange::new(start, end)
    }

    /// The range covering only the current local date. Used when a
    /// caller supplies no explicit range, matching the API default of
    /// "today's readings".
    pub fn today() -> Self {
        let today = Local::now().naive_local().date();
        DateRange(today, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    /// Render the endpoints as API query parameter values.
    pub fn as_params(&self) -> (String, String) {
        (
            self.0.format(DATE_FORMAT).to_string(),
            self.1.format(DATE_FORMAT).to_string(),
        )
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::try_days(1).unwrap();
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}
