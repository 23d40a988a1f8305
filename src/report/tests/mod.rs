//! Tests for the completeness and gap reports
//!
//! Fixtures are built from byte-exact `.dly` lines so the reports are
//! exercised through the decoder and the archive.

use crate::archive::RawRecords;
use crate::dly::tests::{full_month_line, line_with_gaps};
use crate::models::{DateRange, Element, StationId};
use chrono::NaiveDate;


pub const STATION_A: &str = "USC00000001";
pub const STATION_B: &str = "USC00000002";
pub const STATION_C: &str = "USC00000003";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tmax() -> Element {
    Element::parse("TMAX").unwrap()
}

pub fn ids(raw: &[&str]) -> Vec<StationId> {
    raw.iter().map(|id| StationId::new(*id)).collect()
}

/// A reports TMAX all of March 2012 except day 15; B has only February
pub fn march_scenario() -> RawRecords {
    let mut raw = RawRecords::new();
    raw.insert(
        StationId::new(STATION_A),
        vec![
            full_month_line(STATION_A, 2012, 2, "TMAX", 30),
            line_with_gaps(STATION_A, 2012, 3, "TMAX", 150, &[15]),
            full_month_line(STATION_A, 2012, 3, "TMIN", 20),
        ],
    );
    raw.insert(
        StationId::new(STATION_B),
        vec![full_month_line(STATION_B, 2012, 2, "TMAX", 40)],
    );
    raw
}

pub fn march_2012() -> DateRange {
    DateRange::month(2012, 3).unwrap()
}
