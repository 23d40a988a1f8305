//! Error handling for GHCN-Daily audit operations.
//!
//! Two layers are kept apart: [`AuditError`] aborts a request and is
//! surfaced to the caller, while [`DecodeError`] describes a single bad
//! `.dly` line and never escapes a run (the line is skipped and counted).

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid element code '{code}': {reason}")]
    InvalidElement { code: String, reason: String },

    #[error("Invalid station identifier '{id}': expected 11 alphanumeric characters")]
    InvalidStationId { id: String },

    #[error("Invalid bounding box: {reason}")]
    InvalidBoundingBox { reason: String },

    #[error("No eligible stations report {element} between {start} and {end}")]
    NoEligibleStations {
        element: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Metadata file not found: {path}")]
    MetadataNotFound { path: PathBuf },

    #[error("Failed to read station file {path}")]
    StationFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed for {url}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Export failed for {path}: {reason}")]
    ExportFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AuditError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an element validation error
    pub fn invalid_element(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidElement {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Create a bounding box validation error
    pub fn invalid_bounding_box(reason: impl Into<String>) -> Self {
        Self::InvalidBoundingBox {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

/// Per-line failure while decoding a fixed-width record.
///
/// Recovered locally: the offending line is skipped and decoding carries on
/// with the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line too short for record header: {len} characters")]
    Truncated { len: usize },

    #[error("line width {len} does not match the {expected}-character record layout")]
    LineWidth { len: usize, expected: usize },

    #[error("invalid {field} field '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("month {month} outside 1..=12")]
    MonthOutOfRange { month: u32 },
}

impl DecodeError {
    pub(crate) fn invalid_field(field: &'static str, value: &str) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
        }
    }
}

/// A day slot that does not form a real calendar date (e.g. slot 31 of April)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{year}-{month:02} has no day {day}")]
pub struct CalendarError {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}
