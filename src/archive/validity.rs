//! Per-date presence index for one station and element

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{DateRange, StationId};

/// Which days of a query range a station reported the element on.
///
/// Built once per station per query and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationValidityIndex {
    station_id: StationId,
    range: DateRange,
    present: BTreeSet<NaiveDate>,
}

impl StationValidityIndex {
    pub(crate) fn new(station_id: StationId, range: DateRange, present: BTreeSet<NaiveDate>) -> Self {
        Self {
            station_id,
            range,
            present,
        }
    }

    /// Index for a station with no data: every day absent
    pub fn all_absent(station_id: StationId, range: DateRange) -> Self {
        Self::new(station_id, range, BTreeSet::new())
    }

    pub fn station_id(&self) -> &StationId {
        &self.station_id
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// False for dates outside the range
    pub fn is_present(&self, date: NaiveDate) -> bool {
        self.present.contains(&date)
    }

    pub fn total_days(&self) -> usize {
        self.range.len_days()
    }

    pub fn present_days(&self) -> usize {
        self.present.len()
    }

    pub fn missing_days(&self) -> usize {
        self.total_days() - self.present_days()
    }

    /// Absent days in ascending order
    pub fn missing_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.range.days().filter(|day| !self.present.contains(day))
    }
}
