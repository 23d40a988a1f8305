//! Core data structures shared across the auditor.
//!
//! Typed identifiers for stations and element codes, and the inclusive
//! [`DateRange`] every query runs over.

use crate::constants::{ELEMENT_CODE_WIDTH, dly_layout};
use crate::error::{AuditError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Station Identifier
// =============================================================================

/// GHCN-Daily station identifier (e.g. `USW00094728`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Wrap an identifier taken verbatim from a feed file
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse user input, rejecting anything that is not 11 ASCII alphanumerics
    pub fn parse(raw: &str) -> Result<Self> {
        let id = raw.trim();
        let width = dly_layout::STATION_ID.len();
        if id.len() != width || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AuditError::InvalidStationId { id: id.to_string() });
        }
        Ok(Self(id.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// Element Code
// =============================================================================

/// Four-character element (variable) code such as `TMAX` or `PRCP`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Element(String);

impl Element {
    /// Parse an element code, normalising case the way the prompt-driven
    /// workflow always did (`tmax` is accepted as `TMAX`)
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() != ELEMENT_CODE_WIDTH {
            return Err(AuditError::invalid_element(
                raw,
                format!("expected {} characters", ELEMENT_CODE_WIDTH),
            ));
        }
        if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(AuditError::invalid_element(
                raw,
                "only letters and digits are allowed",
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when a raw 4-character field from a record line names this element
    pub fn matches(&self, field: &str) -> bool {
        self.0 == field
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive, non-empty range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked serialized form, validated through [`DateRange::new`]
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = AuditError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range, rejecting an end date before the start date
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AuditError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Range covering every day of one calendar month
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            AuditError::configuration(format!("{}-{:02} is not a calendar month", year, month))
        })?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| AuditError::configuration(format!("{}-{:02} has no end", year, month)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, endpoints included
    pub fn len_days(&self) -> usize {
        // end >= start always holds, so the span is never negative
        usize::try_from((self.end - self.start).num_days()).map_or(0, |span| span + 1)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// True when some day of `year`-`month` falls inside the range
    pub fn overlaps_month(&self, year: i32, month: u32) -> bool {
        let first = (self.start.year(), self.start.month());
        let last = (self.end.year(), self.end.month());
        first <= (year, month) && (year, month) <= last
    }

    /// Iterate every day in ascending order
    pub fn days(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
        }
    }

    /// Compact label used in export file names
    pub fn label(&self) -> String {
        format!("{}_{}", self.start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Day-by-day iterator over a [`DateRange`]
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}
