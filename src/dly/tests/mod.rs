//! Test utilities for building synthetic `.dly` lines
//!
//! Shared with the archive and report test modules so every layer is
//! exercised with byte-exact record lines.

use crate::constants::dly_layout::SLOTS_PER_LINE;

mod decoder_tests;

/// Build a well-formed 269-character line.
///
/// `values[i]` fills day `i + 1`; `None` prints the -9999 sentinel.
pub fn synthetic_line(
    station: &str,
    year: i32,
    month: u32,
    element: &str,
    values: &[Option<i32>; SLOTS_PER_LINE],
) -> String {
    let mut line = format!("{:<11}{:04}{:02}{:<4}", station, year, month, element);
    for value in values {
        match value {
            Some(v) => line.push_str(&format!("{:>5}  W", v)),
            None => line.push_str("-9999   "),
        }
    }
    line
}

/// Line with every slot reporting `value`
pub fn full_month_line(station: &str, year: i32, month: u32, element: &str, value: i32) -> String {
    synthetic_line(station, year, month, element, &[Some(value); SLOTS_PER_LINE])
}

/// Line with every slot reporting `value` except the listed 1-based days
pub fn line_with_gaps(
    station: &str,
    year: i32,
    month: u32,
    element: &str,
    value: i32,
    missing_days: &[u32],
) -> String {
    let mut values = [Some(value); SLOTS_PER_LINE];
    for day in missing_days {
        values[*day as usize - 1] = None;
    }
    synthetic_line(station, year, month, element, &values)
}

/// Overwrite the 5-character value field of a 1-based day slot
pub fn with_raw_slot(line: &str, day: u32, raw: &str) -> String {
    assert_eq!(raw.len(), 5, "value field is 5 characters");
    let start = 21 + (day as usize - 1) * 8;
    let mut out = line.to_string();
    out.replace_range(start..start + 5, raw);
    out
}

#[test]
fn test_synthetic_line_width() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 100);
    assert_eq!(line.len(), 269);
    assert_eq!(&line[0..11], "USW00094728");
    assert_eq!(&line[17..21], "TMAX");
}
