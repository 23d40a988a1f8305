//! GHCN-Daily Missing-Data Auditor
//!
//! A Rust library for measuring how complete GHCN-Daily station records are
//! for one element over a region and date range.
//!
//! This library provides tools for:
//! - Decoding fixed-width `.dly` station-month lines
//! - Building per-station archives with a last-line-wins duplicate policy
//! - Counting reporting and missing stations for every date of a range
//! - Summarizing per-station gaps
//! - Selecting stations by bounding box and inventory coverage
//! - Caching and downloading station files
//! - Exporting reports as CSV or Parquet

pub mod archive;
pub mod config;
pub mod constants;
pub mod dly;
pub mod error;
pub mod export;
pub mod fetch;
pub mod models;
pub mod progress;
pub mod report;
pub mod runner;
pub mod stations;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::AuditConfig;
pub use error::{AuditError, DecodeError, Result};
pub use models::{DateRange, Element, StationId};
pub use report::{AuditReport, CompletenessRow, StationGapRow, audit};
pub use runner::{AuditRequest, AuditRunner, StationSelection};
