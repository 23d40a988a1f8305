//! Command-line argument definitions for the GHCN-Daily auditor
//!
//! A query names one element, one date range (explicit dates or a calendar
//! month) and one station set (a bounding box or explicit identifiers).

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::export::ExportFormat;
use crate::models::{DateRange, Element, StationId};
use crate::runner::{AuditRequest, StationSelection};
use crate::stations::BoundingBox;

/// CLI arguments for the missing-data auditor
///
/// Counts, for every day of a date range, how many stations in a region
/// failed to report an element, and lists the stations with gaps.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ghcnd-audit",
    version,
    about = "Audit GHCN-Daily station records for missing observations",
    long_about = "Selects GHCN-Daily stations inside a bounding box (or from an explicit list), \
                  fetches their .dly files into a local cache and reports, per day and per \
                  station, which observations of one element are missing over a date range."
)]
pub struct Args {
    /// Element code such as TMAX, TMIN, PRCP or TAVG
    #[arg(short, long, default_value = "TMAX")]
    pub element: String,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long, requires = "end", conflicts_with_all = ["year", "month"])]
    pub start: Option<NaiveDate>,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<NaiveDate>,

    /// Audit one calendar month of this year (with --month)
    #[arg(long, requires = "month")]
    pub year: Option<i32>,

    /// Month number 1-12 (with --year)
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    #[arg(long, allow_negative_numbers = true, requires_all = ["max_lat", "min_lon", "max_lon"])]
    pub min_lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "min_lat")]
    pub max_lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "min_lat")]
    pub min_lon: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "min_lat")]
    pub max_lon: Option<f64>,

    /// Audit these station identifiers instead of a region (repeatable)
    #[arg(
        long = "station",
        value_name = "ID",
        conflicts_with_all = ["min_lat", "max_lat", "min_lon", "max_lon"]
    )]
    pub stations: Vec<String>,

    /// Station metadata file (ghcnd-stations.txt)
    #[arg(long, value_name = "PATH")]
    pub stations_file: Option<PathBuf>,

    /// Station inventory file (ghcnd-inventory.txt)
    #[arg(long, value_name = "PATH")]
    pub inventory_file: Option<PathBuf>,

    /// Directory for cached .dly files
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Directory for exported tables
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Output table format
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Use only station files already in the cache
    #[arg(long)]
    pub no_download: bool,

    /// Decode stations in parallel
    #[arg(long)]
    pub parallel: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    pub fn element(&self) -> Result<Element> {
        Element::parse(&self.element)
    }

    /// Date range from `--start/--end` or `--year/--month`
    pub fn date_range(&self) -> Result<DateRange> {
        match (self.start, self.end, self.year, self.month) {
            (Some(start), Some(end), _, _) => DateRange::new(start, end),
            (_, _, Some(year), Some(month)) => DateRange::month(year, month),
            _ => Err(AuditError::configuration(
                "a date range is required: use --start/--end or --year/--month",
            )),
        }
    }

    /// Station selection from `--station` or the bounding box flags
    pub fn selection(&self) -> Result<StationSelection> {
        if !self.stations.is_empty() {
            let ids = self
                .stations
                .iter()
                .map(|raw| StationId::parse(raw))
                .collect::<Result<Vec<_>>>()?;
            return Ok(StationSelection::Explicit(ids));
        }

        match (self.min_lat, self.max_lat, self.min_lon, self.max_lon) {
            (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon)) => Ok(
                StationSelection::Region(BoundingBox::new(min_lat, max_lat, min_lon, max_lon)?),
            ),
            _ => Err(AuditError::configuration(
                "a region is required: use --min-lat/--max-lat/--min-lon/--max-lon or --station",
            )),
        }
    }

    /// Validate the query and build the request
    pub fn request(&self) -> Result<AuditRequest> {
        Ok(AuditRequest {
            element: self.element()?,
            range: self.date_range()?,
            selection: self.selection()?,
        })
    }

    /// Apply CLI overrides on top of a loaded configuration
    pub fn apply_overrides(&self, mut config: AuditConfig) -> AuditConfig {
        if let Some(path) = &self.stations_file {
            config = config.with_stations_file(path);
        }
        if let Some(path) = &self.inventory_file {
            config = config.with_inventory_file(path);
        }
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(format) = self.format {
            config = config.with_export_format(format);
        }
        if self.no_download {
            config = config.without_download();
        }
        if self.parallel {
            config = config.with_parallel_decode(true);
        }
        config
    }
}
