//! Per-station decoding and in-memory indexing
//!
//! A [`StationArchive`] owns the decoded month records of one station and
//! answers validity queries over a date range. Raw lines are supplied by the
//! caller through [`RawRecords`]; nothing in this module touches the
//! filesystem or the network.
//!
//! - [`raw`] - raw `.dly` lines keyed by station
//! - [`station_archive`] - decoding, last-write-wins indexing, statistics
//! - [`validity`] - the per-date presence index handed to the reports
//! - [`stats`] - decode counters

pub mod raw;
pub mod station_archive;
pub mod stats;
pub mod validity;

#[cfg(test)]
pub mod tests;

pub use raw::RawRecords;
pub use station_archive::StationArchive;
pub use stats::ArchiveStats;
pub use validity::StationValidityIndex;
