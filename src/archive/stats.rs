//! Decode statistics for station archives

use serde::{Deserialize, Serialize};

/// Cap on stored error messages per archive
const MAX_RECORDED_ERRORS: usize = 20;

/// Counters collected while decoding one or more station archives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Stations decoded into archives
    pub stations: usize,

    /// Stations with no retrievable raw data
    pub stations_without_data: usize,

    /// Raw lines scanned
    pub lines_read: usize,

    /// Lines decoded into month records for the requested element
    pub records_decoded: usize,

    /// Lines skipped because they carry a different element
    pub other_element_lines: usize,

    /// Lines skipped because they name a different station
    pub foreign_station_lines: usize,

    /// Lines rejected by the decoder
    pub decode_failures: usize,

    /// Month records replaced by a later line for the same month
    pub duplicates_replaced: usize,

    /// First few decode errors, for debugging
    pub errors: Vec<String>,
}

impl ArchiveStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.decode_failures += 1;
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(message);
        }
    }

    /// Fold another archive's counters into this one
    pub fn merge(&mut self, other: &ArchiveStats) {
        self.stations += other.stations;
        self.stations_without_data += other.stations_without_data;
        self.lines_read += other.lines_read;
        self.records_decoded += other.records_decoded;
        self.other_element_lines += other.other_element_lines;
        self.foreign_station_lines += other.foreign_station_lines;
        self.decode_failures += other.decode_failures;
        self.duplicates_replaced += other.duplicates_replaced;

        let room = MAX_RECORDED_ERRORS.saturating_sub(self.errors.len());
        self.errors.extend(other.errors.iter().take(room).cloned());
    }
}
