//! Decoded station-month records and their calendar expansion

use crate::constants::dly_layout::SLOTS_PER_LINE;
use crate::error::CalendarError;
use crate::models::{Element, StationId};
use chrono::NaiveDate;
use serde::Serialize;

/// One decoded `.dly` line: 31 day slots of one element for one station-month.
///
/// `values[i]` holds day `i + 1`. A slot is `None` when the source printed the
/// missing sentinel or the value did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRecord {
    pub station_id: StationId,
    pub element: Element,
    pub year: i32,
    pub month: u32,
    pub values: [Option<i32>; SLOTS_PER_LINE],
}

/// A calendar date and the value observed on it, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<i32>,
}

impl Observation {
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

impl MonthRecord {
    /// Value for a 1-based day slot
    pub fn value(&self, day: u32) -> Option<i32> {
        let index = usize::try_from(day).ok()?.checked_sub(1)?;
        self.values.get(index).copied().flatten()
    }

    /// Slots that carry a value, including impossible dates such as 30 February
    pub fn reported_slots(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Expand the 31 slots into calendar observations.
    ///
    /// Slots that are not real dates for this year and month are dropped.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.values.iter().enumerate().filter_map(|(index, value)| {
            let day = index as u32 + 1;
            slot_date(self.year, self.month, day)
                .ok()
                .map(|date| Observation {
                    date,
                    value: *value,
                })
        })
    }
}

/// Calendar date of a day slot, or the reason it is not one
pub fn slot_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CalendarError { year, month, day })
}
