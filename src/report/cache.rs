//! One decode pass per station, shared by both reports

use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::archive::{ArchiveStats, RawRecords, StationArchive, StationValidityIndex};
use crate::models::{DateRange, Element, StationId};

/// Validity indexes for an ordered, duplicate-free station set
#[derive(Debug, Clone)]
pub struct ValidityCache {
    element: Element,
    range: DateRange,
    indexes: Vec<StationValidityIndex>,
    stats: ArchiveStats,
}

impl ValidityCache {
    /// Decode each station once and keep its validity index.
    ///
    /// Repeated identifiers are dropped after their first occurrence. With
    /// `parallel` set, stations are decoded on the rayon pool; results are
    /// collected in station order so the output is identical either way.
    pub fn build(
        raw: &RawRecords,
        station_ids: &[StationId],
        element: &Element,
        range: DateRange,
        parallel: bool,
    ) -> Self {
        let stations = distinct(station_ids);
        debug!(
            "Building validity for {} stations, {} over {}",
            stations.len(),
            element,
            range
        );

        let decode = |id: &StationId| {
            let archive = StationArchive::from_raw(raw, id, element);
            (archive.observations(element, range), archive.stats().clone())
        };

        let decoded: Vec<(StationValidityIndex, ArchiveStats)> = if parallel {
            stations.par_iter().map(|id| decode(*id)).collect()
        } else {
            stations.iter().map(|id| decode(*id)).collect()
        };

        let mut stats = ArchiveStats::new();
        let mut indexes = Vec::with_capacity(decoded.len());
        for (index, station_stats) in decoded {
            stats.merge(&station_stats);
            indexes.push(index);
        }

        Self {
            element: element.clone(),
            range,
            indexes,
            stats,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Indexes in station iteration order
    pub fn indexes(&self) -> &[StationValidityIndex] {
        &self.indexes
    }

    pub fn station_count(&self) -> usize {
        self.indexes.len()
    }

    /// Decode counters summed over all stations
    pub fn stats(&self) -> &ArchiveStats {
        &self.stats
    }
}

fn distinct(station_ids: &[StationId]) -> Vec<&StationId> {
    let mut seen = HashSet::with_capacity(station_ids.len());
    let mut stations = Vec::with_capacity(station_ids.len());
    for id in station_ids {
        if seen.insert(id) {
            stations.push(id);
        } else {
            warn!("Station {} listed more than once, keeping first", id);
        }
    }
    stations
}
