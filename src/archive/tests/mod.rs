//! Tests for station archives and validity indexes

use crate::models::{DateRange, Element};
use chrono::NaiveDate;


pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tmax() -> Element {
    Element::parse("TMAX").unwrap()
}

pub fn march_2012() -> DateRange {
    DateRange::month(2012, 3).unwrap()
}
