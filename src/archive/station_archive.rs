//! Decoded month records for one station

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::raw::RawRecords;
use super::stats::ArchiveStats;
use super::validity::StationValidityIndex;
use crate::dly::{MonthRecord, decode_line};
use crate::models::{DateRange, Element, StationId};

/// Key of one station-month record
type MonthKey = (Element, i32, u32);

/// All decoded month records of one station, indexed by (element, year, month)
#[derive(Debug, Clone)]
pub struct StationArchive {
    station_id: StationId,
    months: HashMap<MonthKey, MonthRecord>,
    stats: ArchiveStats,
}

impl StationArchive {
    /// Archive for a station whose raw data could not be retrieved
    pub fn empty(station_id: StationId) -> Self {
        let stats = ArchiveStats {
            stations: 1,
            stations_without_data: 1,
            ..ArchiveStats::default()
        };
        Self {
            station_id,
            months: HashMap::new(),
            stats,
        }
    }

    /// Decode every line of a station for `element`.
    ///
    /// When two lines describe the same month the later one replaces the
    /// earlier one (last write wins). Lines naming another station and lines
    /// the decoder rejects are skipped and counted.
    pub fn decode<I, S>(station_id: StationId, lines: I, element: &Element) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut months = HashMap::new();
        let mut stats = ArchiveStats {
            stations: 1,
            ..ArchiveStats::default()
        };

        for (index, line) in lines.into_iter().enumerate() {
            stats.lines_read += 1;
            let line_number = index + 1;

            let record = match decode_line(line.as_ref(), element) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    stats.other_element_lines += 1;
                    continue;
                }
                Err(e) => {
                    debug!("{} line {}: {}", station_id, line_number, e);
                    stats.record_error(format!("line {}: {}", line_number, e));
                    continue;
                }
            };

            if record.station_id != station_id {
                debug!(
                    "{} line {}: skipping record for station {}",
                    station_id, line_number, record.station_id
                );
                stats.foreign_station_lines += 1;
                continue;
            }

            stats.records_decoded += 1;
            let key = (record.element.clone(), record.year, record.month);
            if months.insert(key, record).is_some() {
                debug!(
                    "{} line {}: replaces an earlier record for the same month",
                    station_id, line_number
                );
                stats.duplicates_replaced += 1;
            }
        }

        Self {
            station_id,
            months,
            stats,
        }
    }

    /// Decode a station from a raw record set, or an empty archive when the
    /// set holds nothing for it
    pub fn from_raw(raw: &RawRecords, station_id: &StationId, element: &Element) -> Self {
        match raw.get(station_id) {
            Some(lines) => Self::decode(station_id.clone(), lines, element),
            None => {
                debug!("{}: no raw data, treating every day as missing", station_id);
                Self::empty(station_id.clone())
            }
        }
    }

    pub fn station_id(&self) -> &StationId {
        &self.station_id
    }

    pub fn stats(&self) -> &ArchiveStats {
        &self.stats
    }

    /// Number of distinct station-months held
    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn month(&self, element: &Element, year: i32, month: u32) -> Option<&MonthRecord> {
        self.months.get(&(element.clone(), year, month))
    }

    /// Presence of `element` on every day of `range`.
    ///
    /// Slots that are not calendar dates and dates outside the range are
    /// ignored.
    pub fn observations(&self, element: &Element, range: DateRange) -> StationValidityIndex {
        let mut present = BTreeSet::new();

        for ((record_element, year, month), record) in &self.months {
            if record_element != element || !range.overlaps_month(*year, *month) {
                continue;
            }
            present.extend(
                record
                    .observations()
                    .filter(|o| o.is_present() && range.contains(o.date))
                    .map(|o| o.date),
            );
        }

        StationValidityIndex::new(self.station_id.clone(), range, present)
    }
}
