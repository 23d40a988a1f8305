//! Tests for single-line decoding

use super::*;
use crate::dly::decode_line;
use crate::error::DecodeError;
use crate::models::Element;

fn tmax() -> Element {
    Element::parse("TMAX").unwrap()
}

#[test]
fn test_decode_header_fields() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 56);
    let record = decode_line(&line, &tmax()).unwrap().unwrap();

    assert_eq!(record.station_id.as_str(), "USW00094728");
    assert_eq!(record.element.as_str(), "TMAX");
    assert_eq!(record.year, 2012);
    assert_eq!(record.month, 3);
    assert!(record.values.iter().all(|v| *v == Some(56)));
}

#[test]
fn test_other_element_is_skipped_not_rejected() {
    let line = full_month_line("USW00094728", 2012, 3, "PRCP", 0);
    assert_eq!(decode_line(&line, &tmax()), Ok(None));
}

#[test]
fn test_short_line_of_other_element_is_still_skipped() {
    // Width is only checked once the element matches
    let line = "USW00094728201203PRCP    0  W";
    assert_eq!(decode_line(line, &tmax()), Ok(None));
}

#[test]
fn test_sentinel_is_absent() {
    let line = line_with_gaps("USW00094728", 2012, 3, "TMAX", 120, &[1, 15, 31]);
    let record = decode_line(&line, &tmax()).unwrap().unwrap();

    assert_eq!(record.value(1), None);
    assert_eq!(record.value(15), None);
    assert_eq!(record.value(31), None);
    assert_eq!(record.value(2), Some(120));
    assert_eq!(record.reported_slots(), 28);
}

#[test]
fn test_unparseable_slot_is_absent() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 10);
    let line = with_raw_slot(&line, 7, "  X1 ");
    let record = decode_line(&line, &tmax()).unwrap().unwrap();

    assert_eq!(record.value(7), None);
    assert_eq!(record.value(6), Some(10));
    assert_eq!(record.value(8), Some(10));
}

#[test]
fn test_blank_slot_is_absent() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 10);
    let line = with_raw_slot(&line, 20, "     ");
    let record = decode_line(&line, &tmax()).unwrap().unwrap();
    assert_eq!(record.value(20), None);
}

#[test]
fn test_negative_and_zero_values_are_observations() {
    let mut values = [Some(0); 31];
    values[0] = Some(-123);
    values[1] = Some(-9998);
    let line = synthetic_line("CA001234567", 1999, 1, "TMAX", &values);
    let record = decode_line(&line, &tmax()).unwrap().unwrap();

    assert_eq!(record.value(1), Some(-123));
    assert_eq!(record.value(2), Some(-9998));
    assert_eq!(record.value(3), Some(0));
}

#[test]
fn test_non_numeric_year_rejects_line() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 1);
    let mut broken = line.clone();
    broken.replace_range(11..15, "20X2");

    assert_eq!(
        decode_line(&broken, &tmax()),
        Err(DecodeError::InvalidField {
            field: "year",
            value: "20X2".to_string()
        })
    );
}

#[test]
fn test_non_numeric_month_rejects_line() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 1);
    let mut broken = line.clone();
    broken.replace_range(15..17, " -");

    assert!(matches!(
        decode_line(&broken, &tmax()),
        Err(DecodeError::InvalidField { field: "month", .. })
    ));
}

#[test]
fn test_month_out_of_range_rejects_line() {
    let line = full_month_line("USW00094728", 2012, 13, "TMAX", 1);
    assert_eq!(
        decode_line(&line, &tmax()),
        Err(DecodeError::MonthOutOfRange { month: 13 })
    );
}

#[test]
fn test_truncated_line() {
    assert_eq!(
        decode_line("USW0009472820", &tmax()),
        Err(DecodeError::Truncated { len: 13 })
    );
    assert_eq!(decode_line("", &tmax()), Err(DecodeError::Truncated { len: 0 }));
}

#[test]
fn test_wrong_width_for_matching_element() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 1);
    let short = &line[..200];

    assert_eq!(
        decode_line(short, &tmax()),
        Err(DecodeError::LineWidth {
            len: 200,
            expected: 269
        })
    );
}

#[test]
fn test_line_endings_are_ignored() {
    let line = full_month_line("USW00094728", 2012, 3, "TMAX", 1);
    let crlf = format!("{}\r\n", line);
    assert!(decode_line(&crlf, &tmax()).unwrap().is_some());
}
