//! Raw record lines handed over by the retrieval layer

use std::collections::HashMap;

use crate::models::StationId;

/// Raw `.dly` lines for a set of stations.
///
/// A station with no entry has no retrievable data; it is still audited and
/// counts as missing on every date.
#[derive(Debug, Clone, Default)]
pub struct RawRecords {
    lines: HashMap<StationId, Vec<String>>,
}

impl RawRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the lines of one station, replacing anything stored before
    pub fn insert(&mut self, station_id: StationId, lines: Vec<String>) {
        self.lines.insert(station_id, lines);
    }

    /// Lines for a station, `None` when its data could not be retrieved
    pub fn get(&self, station_id: &StationId) -> Option<&[String]> {
        self.lines.get(station_id).map(Vec::as_slice)
    }

    pub fn contains(&self, station_id: &StationId) -> bool {
        self.lines.contains_key(station_id)
    }

    /// Number of stations with retrievable data
    pub fn station_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of stored lines across stations
    pub fn line_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }
}
