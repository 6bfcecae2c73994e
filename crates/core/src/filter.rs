//! Date range filter over travel dates.
//!
//! Dates are timezone-naive calendar dates on both sides: the bounds come
//! from `<input type="date">` and the record date is read from its leading
//! `YYYY-MM-DD`. No offset is ever applied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::PassengerRecord;

/// A bound that could not be read as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date \"{0}\", expected YYYY-MM-DD")]
pub struct FilterError(pub String);

/// Inclusive date range; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRangeFilter {
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Read a bound from a date picker value. Blank means "open".
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the value is not blank and not a
    /// `YYYY-MM-DD` date.
    pub fn parse_bound(value: &str) -> Result<Option<NaiveDate>, FilterError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FilterError(value.to_owned()))
    }

    pub const fn set_start(&mut self, start: Option<NaiveDate>) {
        self.start = start;
    }

    /// Set the upper bound.
    ///
    /// The date picker refuses an end before the start, but nothing here
    /// relies on that: such a range simply matches nothing.
    pub const fn set_end(&mut self, end: Option<NaiveDate>) {
        self.end = end;
    }

    pub const fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Whether at least one bound is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether a record's travel date falls inside the range.
    ///
    /// With no bounds every record matches, including ones whose date cannot
    /// be read. With any bound set, an unreadable date never matches.
    #[must_use]
    pub fn matches(&self, record: &PassengerRecord) -> bool {
        if !self.is_active() {
            return true;
        }
        record.travel_date().is_some_and(|date| self.contains(date))
    }

    /// Whether a calendar date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    /// Banner text describing the active range.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(format!("{start} to {end}")),
            (Some(start), None) => Some(format!("From {start}")),
            (None, Some(end)) => Some(format!("Until {end}")),
            (None, None) => None,
        }
    }
}
