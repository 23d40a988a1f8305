//! Per-station gap summary

use serde::Serialize;

use super::cache::ValidityCache;
use super::percent::PercentMissing;
use crate::archive::RawRecords;
use crate::models::{DateRange, Element, StationId};

/// Decimal places kept for per-station percentages
const PERCENT_DECIMALS: i32 = 2;

/// A station that missed at least one day of the range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationGapRow {
    pub station_id: StationId,
    pub total_days: usize,
    pub missing_days: usize,
    pub missing_percent: f64,
}

/// Derives per-station gap rows from the shared validity cache
#[derive(Debug)]
pub struct StationGapSummarizer<'a> {
    cache: &'a ValidityCache,
}

impl<'a> StationGapSummarizer<'a> {
    pub fn new(cache: &'a ValidityCache) -> Self {
        Self { cache }
    }

    /// Stations with a gap, in station iteration order.
    ///
    /// The percentage is taken against the full range length.
    pub fn summarize(&self) -> Vec<StationGapRow> {
        self.cache
            .indexes()
            .iter()
            .filter(|index| index.missing_days() > 0)
            .filter_map(|index| {
                let total_days = index.total_days();
                let missing_days = index.missing_days();
                PercentMissing::of(missing_days, total_days, PERCENT_DECIMALS)
                    .value()
                    .map(|missing_percent| StationGapRow {
                        station_id: index.station_id().clone(),
                        total_days,
                        missing_days,
                        missing_percent,
                    })
            })
            .collect()
    }
}

/// Decode `station_ids` once and list the stations with gaps
pub fn summarize(
    raw: &RawRecords,
    station_ids: &[StationId],
    element: &Element,
    range: DateRange,
) -> Vec<StationGapRow> {
    let cache = ValidityCache::build(raw, station_ids, element, range, false);
    StationGapSummarizer::new(&cache).summarize()
}
