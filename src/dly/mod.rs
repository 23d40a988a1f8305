//! Fixed-width GHCN-Daily record decoding
//!
//! Every `.dly` line carries one month of one element for one station:
//!
//! ```text
//! USW00094728201203TMAX   56  W   78  W-9999   ...
//! |----id---||yr||m||el||slot 1||slot 2||slot 3|
//! ```
//!
//! - [`decoder`] - turns one line into a [`MonthRecord`] for a chosen element
//! - [`record`] - the decoded month and its expansion into calendar dates

pub mod decoder;
pub mod record;

#[cfg(test)]
pub mod tests;

pub use decoder::decode_line;
pub use record::{MonthRecord, Observation, slot_date};
