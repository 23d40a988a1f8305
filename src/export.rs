//! Tabular export of audit reports
//!
//! Reports are turned into polars DataFrames and written as CSV or Parquet.
//! A percentage that does not apply is stored as null and rendered `N/A`
//! in CSV output.

use clap::ValueEnum;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::MISSING_ID_SEPARATOR;
use crate::error::{AuditError, Result};
use crate::models::{DateRange, Element, StationId};
use crate::report::{AuditReport, CompletenessRow, StationGapRow};
use crate::stations::Station;

/// Text written in place of null cells in CSV output
const CSV_NULL_VALUE: &str = "N/A";

/// Output table format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Tables produced by one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    MissingSummary,
    StationsWithMissingData,
    SelectedStations,
}

impl TableKind {
    fn stem(&self) -> &'static str {
        match self {
            TableKind::MissingSummary => "missing_summary",
            TableKind::StationsWithMissingData => "stations_with_missing_data",
            TableKind::SelectedStations => "selected_stations",
        }
    }

    /// `<kind>_<ELEM>_<start>_<end>.<ext>`
    pub fn file_name(&self, element: &Element, range: DateRange, format: ExportFormat) -> String {
        format!(
            "{}_{}_{}.{}",
            self.stem(),
            element,
            range.label(),
            format.extension()
        )
    }
}

// =============================================================================
// DataFrames
// =============================================================================

pub fn completeness_frame(rows: &[CompletenessRow]) -> PolarsResult<DataFrame> {
    let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();
    let reporting: Vec<u32> = rows.iter().map(|r| r.reporting as u32).collect();
    let missing: Vec<u32> = rows.iter().map(|r| r.missing as u32).collect();
    let total: Vec<u32> = rows.iter().map(|r| r.total as u32).collect();
    let percent: Vec<Option<f64>> = rows.iter().map(|r| r.percent_missing.value()).collect();
    let missing_ids: Vec<String> = rows
        .iter()
        .map(|r| join_ids(&r.missing_stations))
        .collect();

    df!(
        "Date" => dates,
        "Stations Reporting" => reporting,
        "Stations Missing" => missing,
        "Total Stations" => total,
        "% Missing" => percent,
        "Missing Station IDs" => missing_ids,
    )
}

/// Gap rows joined with station metadata; location columns are null for
/// stations without metadata
pub fn gaps_frame(gaps: &[StationGapRow], stations: &[Station]) -> PolarsResult<DataFrame> {
    let lookup: HashMap<&StationId, &Station> = stations.iter().map(|s| (&s.id, s)).collect();
    let meta = |id: &StationId| lookup.get(id).copied();

    let ids: Vec<String> = gaps.iter().map(|g| g.station_id.to_string()).collect();
    let lat: Vec<Option<f64>> = gaps
        .iter()
        .map(|g| meta(&g.station_id).map(|s| s.latitude))
        .collect();
    let lon: Vec<Option<f64>> = gaps
        .iter()
        .map(|g| meta(&g.station_id).map(|s| s.longitude))
        .collect();
    let names: Vec<Option<String>> = gaps
        .iter()
        .map(|g| meta(&g.station_id).map(|s| s.name.clone()))
        .collect();
    let total: Vec<u32> = gaps.iter().map(|g| g.total_days as u32).collect();
    let missing: Vec<u32> = gaps.iter().map(|g| g.missing_days as u32).collect();
    let percent: Vec<f64> = gaps.iter().map(|g| g.missing_percent).collect();

    df!(
        "ID" => ids,
        "LAT" => lat,
        "LON" => lon,
        "NAME" => names,
        "Total Days" => total,
        "Missing Days" => missing,
        "Missing %" => percent,
    )
}

/// Selected stations with whatever location metadata is known
pub fn selected_frame(station_ids: &[StationId], stations: &[Station]) -> PolarsResult<DataFrame> {
    let lookup: HashMap<&StationId, &Station> = stations.iter().map(|s| (&s.id, s)).collect();
    let meta = |id: &StationId| lookup.get(id).copied();

    let ids: Vec<String> = station_ids.iter().map(StationId::to_string).collect();
    let lat: Vec<Option<f64>> = station_ids
        .iter()
        .map(|id| meta(id).map(|s| s.latitude))
        .collect();
    let lon: Vec<Option<f64>> = station_ids
        .iter()
        .map(|id| meta(id).map(|s| s.longitude))
        .collect();
    let names: Vec<Option<String>> = station_ids
        .iter()
        .map(|id| meta(id).map(|s| s.name.clone()))
        .collect();

    df!(
        "ID" => ids,
        "LAT" => lat,
        "LON" => lon,
        "NAME" => names,
    )
}

fn join_ids(ids: &[StationId]) -> String {
    ids.iter()
        .map(StationId::as_str)
        .collect::<Vec<_>>()
        .join(MISSING_ID_SEPARATOR)
}

// =============================================================================
// Writers
// =============================================================================

/// Write one DataFrame in the requested format
pub fn write_frame(df: &mut DataFrame, path: &Path, format: ExportFormat) -> Result<()> {
    let file = File::create(path)?;
    let written = match format {
        ExportFormat::Csv => CsvWriter::new(file)
            .include_header(true)
            .with_null_value(CSV_NULL_VALUE.to_string())
            .finish(df),
        ExportFormat::Parquet => ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(df)
            .map(|_| ()),
    };

    written.map_err(|e| AuditError::ExportFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Paths of the files written for one report
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub summary: PathBuf,
    pub gaps: PathBuf,
    pub selected: PathBuf,
}

/// Writes the three report tables into one output directory
#[derive(Debug, Clone)]
pub struct ReportExporter {
    output_dir: PathBuf,
    format: ExportFormat,
}

impl ReportExporter {
    pub fn new(output_dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn path_for(&self, kind: TableKind, element: &Element, range: DateRange) -> PathBuf {
        self.output_dir
            .join(kind.file_name(element, range, self.format))
    }

    /// Write the completeness, gap and selected-station tables.
    ///
    /// `stations` supplies location metadata; audited stations missing from
    /// it get null location cells.
    pub fn export(
        &self,
        report: &AuditReport,
        station_ids: &[StationId],
        stations: &[Station],
    ) -> Result<ExportedFiles> {
        std::fs::create_dir_all(&self.output_dir)?;
        let element = &report.element;
        let range = report.range;

        let summary = self.path_for(TableKind::MissingSummary, element, range);
        write_frame(
            &mut completeness_frame(&report.completeness)?,
            &summary,
            self.format,
        )?;

        let gaps = self.path_for(TableKind::StationsWithMissingData, element, range);
        write_frame(&mut gaps_frame(&report.gaps, stations)?, &gaps, self.format)?;

        let selected = self.path_for(TableKind::SelectedStations, element, range);
        write_frame(
            &mut selected_frame(station_ids, stations)?,
            &selected,
            self.format,
        )?;

        info!(
            "Exported {} summary rows and {} gap rows to {}",
            report.completeness.len(),
            report.gaps.len(),
            self.output_dir.display()
        );
        Ok(ExportedFiles {
            summary,
            gaps,
            selected,
        })
    }
}
