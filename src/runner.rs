//! End-to-end audit pipeline
//!
//! 1. Resolve the station set (bounding box + inventory, or an explicit list)
//! 2. Fill the station file cache
//! 3. Load raw lines for the requested element
//! 4. Build both reports from one validity cache
//! 5. Export the tables

use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::export::{ExportedFiles, ReportExporter};
use crate::fetch::{FetchSummary, Fetcher, StationFileCache};
use crate::models::{DateRange, Element, StationId};
use crate::progress::ProgressReporter;
use crate::report::{AuditReport, audit};
use crate::stations::{BoundingBox, Station, load_inventory, load_stations, select_stations};

/// How the audited stations are chosen
#[derive(Debug, Clone, PartialEq)]
pub enum StationSelection {
    /// Stations inside the box whose inventory covers the element and range
    Region(BoundingBox),
    /// Exactly these stations, skipping geographic selection
    Explicit(Vec<StationId>),
}

/// One audit query
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRequest {
    pub element: Element,
    pub range: DateRange,
    pub selection: StationSelection,
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: AuditReport,
    pub station_ids: Vec<StationId>,
    pub stations: Vec<Station>,
    pub fetch: Option<FetchSummary>,
    pub exported: ExportedFiles,
    pub elapsed: Duration,
}

/// Runs audit requests against one configuration
#[derive(Debug, Clone)]
pub struct AuditRunner {
    config: AuditConfig,
    show_progress: bool,
}

impl AuditRunner {
    pub fn new(config: AuditConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Station identifiers to audit plus whatever metadata is known for them
    pub fn resolve_stations(
        &self,
        request: &AuditRequest,
    ) -> Result<(Vec<StationId>, Vec<Station>)> {
        let (ids, stations) = match &request.selection {
            StationSelection::Region(bbox) => {
                bbox.validate()?;
                let stations = load_stations(&self.config.stations_file)?;
                let inventory = load_inventory(&self.config.inventory_file)?;
                let selected =
                    select_stations(&stations, &inventory, bbox, &request.element, request.range);
                let ids = selected.iter().map(|s| s.id.clone()).collect();
                (ids, selected)
            }
            StationSelection::Explicit(ids) => {
                let ids = dedupe(ids);
                (ids.clone(), self.known_metadata(&ids))
            }
        };

        if ids.is_empty() {
            return Err(AuditError::NoEligibleStations {
                element: request.element.to_string(),
                start: request.range.start(),
                end: request.range.end(),
            });
        }
        Ok((ids, stations))
    }

    /// Metadata for an explicit list, when the station file is available
    fn known_metadata(&self, ids: &[StationId]) -> Vec<Station> {
        if !self.config.stations_file.is_file() {
            debug!(
                "No station metadata at {}, location columns will be empty",
                self.config.stations_file.display()
            );
            return Vec::new();
        }
        match load_stations(&self.config.stations_file) {
            Ok(stations) => {
                let wanted: HashSet<&StationId> = ids.iter().collect();
                stations
                    .into_iter()
                    .filter(|s| wanted.contains(&s.id))
                    .collect()
            }
            Err(e) => {
                warn!("Ignoring station metadata: {}", e);
                Vec::new()
            }
        }
    }

    /// Run one request end to end
    pub async fn run(&self, request: &AuditRequest) -> Result<RunSummary> {
        let start_time = Instant::now();
        info!(
            "Auditing {} from {} to {}",
            request.element,
            request.range.start(),
            request.range.end()
        );

        let (station_ids, stations) = self.resolve_stations(request)?;
        info!("Auditing {} stations", station_ids.len());

        let cache = StationFileCache::new(&self.config.cache_dir);
        let fetch = if self.config.download {
            let fetcher = Fetcher::new(&self.config.base_url)?;
            let progress =
                ProgressReporter::new(station_ids.len(), "Fetching", self.show_progress);
            Some(fetcher.fetch_missing(&cache, &station_ids, &progress).await?)
        } else {
            debug!("Downloads disabled, using cached files only");
            None
        };

        let progress = ProgressReporter::new(station_ids.len(), "Loading", self.show_progress);
        let raw = cache.load(&station_ids, &request.element, &progress).await?;

        let report = audit(
            &raw,
            &station_ids,
            &request.element,
            request.range,
            self.config.parallel_decode,
        );
        info!(
            "{} dates summarized, {} stations with gaps",
            report.completeness.len(),
            report.gaps.len()
        );

        let exporter = ReportExporter::new(&self.config.output_dir, self.config.export_format);
        let exported = exporter.export(&report, &station_ids, &stations)?;

        Ok(RunSummary {
            report,
            station_ids,
            stations,
            fetch,
            exported,
            elapsed: start_time.elapsed(),
        })
    }
}

fn dedupe(ids: &[StationId]) -> Vec<StationId> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}
