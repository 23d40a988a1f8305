//! Single-line decoding for `.dly` records
//!
//! Absence is decided in two tiers: a value field that does not parse is
//! absent, and a parsed value equal to the sentinel is absent. Neither tier
//! raises to the caller; only a broken header (year, month, width) rejects
//! the whole line.

use std::ops::Range;

use crate::constants::MISSING_SENTINEL;
use crate::constants::dly_layout::{
    ELEMENT, FIRST_SLOT, HEADER_WIDTH, LINE_WIDTH, MONTH, SLOT_WIDTH, SLOTS_PER_LINE,
    STATION_ID, VALUE_WIDTH, YEAR,
};
use crate::error::DecodeError;
use crate::models::{Element, StationId};

use super::record::MonthRecord;

/// Decode one fixed-width line for `element`.
///
/// Returns `Ok(None)` when the line belongs to another element, which is the
/// common case when scanning a station file.
///
/// # Errors
///
/// Returns `DecodeError` if:
/// - the line is too short to hold the header fields
/// - the line matches `element` but is not exactly [`LINE_WIDTH`] wide
/// - the year or month field is not numeric, or the month is outside 1..=12
pub fn decode_line(line: &str, element: &Element) -> Result<Option<MonthRecord>, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.len() < HEADER_WIDTH {
        return Err(DecodeError::Truncated { len: line.len() });
    }

    let element_field = field(line, ELEMENT, "element")?;
    if !element.matches(element_field) {
        return Ok(None);
    }

    if line.len() != LINE_WIDTH {
        return Err(DecodeError::LineWidth {
            len: line.len(),
            expected: LINE_WIDTH,
        });
    }

    let station_id = field(line, STATION_ID, "station")?.trim();
    let year = parse_number::<i32>(line, YEAR, "year")?;
    let month = parse_number::<u32>(line, MONTH, "month")?;
    if !(1..=12).contains(&month) {
        return Err(DecodeError::MonthOutOfRange { month });
    }

    let mut values = [None; SLOTS_PER_LINE];
    for (slot, value) in values.iter_mut().enumerate() {
        *value = parse_slot(line, slot);
    }

    Ok(Some(MonthRecord {
        station_id: StationId::new(station_id),
        element: element.clone(),
        year,
        month,
        values,
    }))
}

/// Value of a 0-based day slot; `None` for the sentinel or an unparseable field
fn parse_slot(line: &str, slot: usize) -> Option<i32> {
    let start = FIRST_SLOT + slot * SLOT_WIDTH;
    let raw = line.get(start..start + VALUE_WIDTH)?;
    let value = raw.trim().parse::<i32>().ok()?;
    (value != MISSING_SENTINEL).then_some(value)
}

fn field<'a>(line: &'a str, range: Range<usize>, name: &'static str) -> Result<&'a str, DecodeError> {
    line.get(range)
        .ok_or_else(|| DecodeError::invalid_field(name, "<split multi-byte character>"))
}

fn parse_number<T: std::str::FromStr>(
    line: &str,
    range: Range<usize>,
    name: &'static str,
) -> Result<T, DecodeError> {
    let raw = field(line, range, name)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DecodeError::invalid_field(name, raw));
    }
    trimmed
        .parse::<T>()
        .map_err(|_| DecodeError::invalid_field(name, raw))
}
