//! Per-date completeness across a station set

use chrono::NaiveDate;
use serde::Serialize;

use super::cache::ValidityCache;
use super::percent::PercentMissing;
use crate::archive::RawRecords;
use crate::models::{DateRange, Element, StationId};

/// Decimal places kept for per-date percentages
const PERCENT_DECIMALS: i32 = 1;

/// Reporting and missing counts for one date.
///
/// `reporting + missing == total` always holds; `missing_stations` keeps
/// the station iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessRow {
    pub date: NaiveDate,
    pub reporting: usize,
    pub missing: usize,
    pub total: usize,
    pub percent_missing: PercentMissing,
    pub missing_stations: Vec<StationId>,
}

/// Folds cached validity indexes into one row per date
#[derive(Debug)]
pub struct CompletenessAggregator<'a> {
    cache: &'a ValidityCache,
}

impl<'a> CompletenessAggregator<'a> {
    pub fn new(cache: &'a ValidityCache) -> Self {
        Self { cache }
    }

    /// One row per date of the cached range, ascending.
    ///
    /// With no stations every row has `total == 0` and a not-applicable
    /// percentage.
    pub fn summarize(&self) -> Vec<CompletenessRow> {
        let indexes = self.cache.indexes();
        let total = indexes.len();

        self.cache
            .range()
            .days()
            .map(|date| {
                let missing_stations: Vec<StationId> = indexes
                    .iter()
                    .filter(|index| !index.is_present(date))
                    .map(|index| index.station_id().clone())
                    .collect();
                let missing = missing_stations.len();

                CompletenessRow {
                    date,
                    reporting: total - missing,
                    missing,
                    total,
                    percent_missing: PercentMissing::of(missing, total, PERCENT_DECIMALS),
                    missing_stations,
                }
            })
            .collect()
    }
}

/// Decode `station_ids` once and summarize completeness per date
pub fn summarize(
    raw: &RawRecords,
    station_ids: &[StationId],
    element: &Element,
    range: DateRange,
) -> Vec<CompletenessRow> {
    let cache = ValidityCache::build(raw, station_ids, element, range, false);
    CompletenessAggregator::new(&cache).summarize()
}
