//! Missing-data reports over a station set, element and date range
//!
//! Both reports read from one [`ValidityCache`], so every station is decoded
//! exactly once per query and the per-date and per-station views always
//! agree with each other.
//!
//! ## Usage
//!
//! ```rust
//! use ghcnd_audit::archive::RawRecords;
//! use ghcnd_audit::models::{DateRange, Element, StationId};
//! use ghcnd_audit::report::audit;
//!
//! # fn example() -> ghcnd_audit::Result<()> {
//! let raw = RawRecords::new();
//! let stations = vec![StationId::new("USW00094728")];
//! let element = Element::parse("TMAX")?;
//! let range = DateRange::month(2012, 3)?;
//!
//! let report = audit(&raw, &stations, &element, range, false);
//! assert_eq!(report.completeness.len(), 31);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod completeness;
pub mod gaps;
pub mod percent;

#[cfg(test)]
pub mod tests;

pub use cache::ValidityCache;
pub use completeness::{CompletenessAggregator, CompletenessRow};
pub use gaps::{StationGapRow, StationGapSummarizer};
pub use percent::PercentMissing;

use crate::archive::{ArchiveStats, RawRecords};
use crate::models::{DateRange, Element, StationId};

/// Output of one audit run
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub element: Element,
    pub range: DateRange,
    pub completeness: Vec<CompletenessRow>,
    pub gaps: Vec<StationGapRow>,
    pub stats: ArchiveStats,
}

impl AuditReport {
    /// Stations considered in every row
    pub fn station_count(&self) -> usize {
        self.completeness.first().map_or(0, |row| row.total)
    }

    /// Mean of the per-date missing percentages, `None` when no row has one
    pub fn mean_percent_missing(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .completeness
            .iter()
            .filter_map(|row| row.percent_missing.value())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// Build the validity cache once and derive both reports from it
pub fn audit(
    raw: &RawRecords,
    station_ids: &[StationId],
    element: &Element,
    range: DateRange,
    parallel: bool,
) -> AuditReport {
    let cache = ValidityCache::build(raw, station_ids, element, range, parallel);
    AuditReport {
        element: element.clone(),
        range,
        completeness: CompletenessAggregator::new(&cache).summarize(),
        gaps: StationGapSummarizer::new(&cache).summarize(),
        stats: cache.stats().clone(),
    }
}
