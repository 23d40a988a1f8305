//! Station file cache and retrieval
//!
//! Station files are kept as `<dir>/<ID>.dly`. The [`Fetcher`] fills the cache
//! from the NOAA archive, one station at a time, and never overwrites a file
//! that is already present. Reading a station that is not cached is not an
//! error: the station simply has no data.

use reqwest::Client;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::archive::RawRecords;
use crate::constants::{STATION_FILE_EXTENSION, dly_layout};
use crate::error::{AuditError, Result};
use crate::models::{Element, StationId};
use crate::progress::ProgressReporter;

/// Timeout applied to each station download
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Cache
// =============================================================================

/// Directory of cached `.dly` station files
#[derive(Debug, Clone)]
pub struct StationFileCache {
    dir: PathBuf,
}

impl StationFileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, station_id: &StationId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", station_id, STATION_FILE_EXTENSION))
    }

    pub fn is_cached(&self, station_id: &StationId) -> bool {
        self.path_for(station_id).is_file()
    }

    /// Create the cache directory if needed
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Lines of one station file that can carry `element`.
    ///
    /// Returns `Ok(None)` when the station is not cached. Lines too short to
    /// name an element are kept so the decoder can count them as malformed.
    pub async fn read_lines(
        &self,
        station_id: &StationId,
        element: &Element,
    ) -> Result<Option<Vec<String>>> {
        let path = self.path_for(station_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cached file for {}", station_id);
                return Ok(None);
            }
            Err(source) => return Err(AuditError::StationFileUnreadable { path, source }),
        };

        // Invalid UTF-8 only spoils the lines it appears on
        let content = String::from_utf8_lossy(&bytes);
        let lines: Vec<String> = content
            .lines()
            .filter(|line| {
                line.get(dly_layout::ELEMENT)
                    .is_none_or(|code| element.matches(code))
            })
            .map(str::to_string)
            .collect();
        debug!(
            "Read {} {} lines for {} from {}",
            lines.len(),
            element,
            station_id,
            path.display()
        );
        Ok(Some(lines))
    }

    /// Load every cached station into memory.
    ///
    /// Uncached stations and stations whose file cannot be read are left out,
    /// so the reports count them as missing on every date.
    pub async fn load(
        &self,
        station_ids: &[StationId],
        element: &Element,
        progress: &ProgressReporter,
    ) -> Result<RawRecords> {
        let mut raw = RawRecords::new();
        let mut absent = 0;

        for station_id in station_ids {
            progress.set_message(format!("Reading {}", station_id));
            match self.read_lines(station_id, element).await {
                Ok(Some(lines)) => raw.insert(station_id.clone(), lines),
                Ok(None) => absent += 1,
                Err(e) => {
                    warn!("Treating {} as missing: {:#}", station_id, e);
                    absent += 1;
                }
            }
            progress.increment();
        }
        progress.finish(format!("Loaded {} stations", raw.station_count()));

        info!(
            "Loaded {} lines for {} stations ({} without a readable file)",
            raw.line_count(),
            raw.station_count(),
            absent
        );
        Ok(raw)
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// Outcome of filling the cache for a station set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchSummary {
    pub already_cached: usize,
    pub downloaded: usize,
    pub failed: Vec<StationId>,
}

/// Downloads station files from the archive into a [`StationFileCache`]
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base_url: String,
}

impl Fetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| AuditError::Download {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    pub fn url_for(&self, station_id: &StationId) -> String {
        format!(
            "{}/{}.{}",
            self.base_url, station_id, STATION_FILE_EXTENSION
        )
    }

    /// Download one station file, writing it only on a successful response
    pub async fn fetch_station(
        &self,
        cache: &StationFileCache,
        station_id: &StationId,
    ) -> Result<()> {
        let url = self.url_for(station_id);
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| AuditError::Download {
                url: url.clone(),
                source,
            })?;
        let body = response
            .bytes()
            .await
            .map_err(|source| AuditError::Download {
                url: url.clone(),
                source,
            })?;

        // Write beside the final path so an interrupted write never looks cached
        let path = cache.path_for(station_id);
        let partial = path.with_extension(format!("{}.part", STATION_FILE_EXTENSION));
        if let Err(e) = tokio::fs::write(&partial, &body).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        tokio::fs::rename(&partial, &path).await?;
        debug!("Saved {} bytes to {}", body.len(), path.display());
        Ok(())
    }

    /// Download every station that is not yet cached.
    ///
    /// Failures are logged and collected; the affected stations stay
    /// uncached and will count as missing on every date.
    pub async fn fetch_missing(
        &self,
        cache: &StationFileCache,
        station_ids: &[StationId],
        progress: &ProgressReporter,
    ) -> Result<FetchSummary> {
        cache.ensure_dir().await?;
        let mut summary = FetchSummary::default();

        for station_id in station_ids {
            if cache.is_cached(station_id) {
                debug!("Cache hit for {}", station_id);
                summary.already_cached += 1;
                progress.increment();
                continue;
            }

            progress.set_message(format!("Downloading {}", station_id));
            match self.fetch_station(cache, station_id).await {
                Ok(()) => summary.downloaded += 1,
                Err(e) => {
                    warn!("Could not retrieve {}: {:#}", station_id, e);
                    summary.failed.push(station_id.clone());
                }
            }
            progress.increment();
        }
        progress.finish(format!(
            "{} downloaded, {} cached",
            summary.downloaded, summary.already_cached
        ));

        info!(
            "Fetch complete: {} downloaded, {} already cached, {} failed",
            summary.downloaded,
            summary.already_cached,
            summary.failed.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dly::tests::full_month_line;
    use tempfile::TempDir;

    const STATION: &str = "USW00094728";

    fn tmax() -> Element {
        Element::parse("TMAX").unwrap()
    }

    #[test]
    fn test_path_for_station() {
        let cache = StationFileCache::new("/tmp/dly");
        assert_eq!(
            cache.path_for(&StationId::new(STATION)),
            PathBuf::from("/tmp/dly/USW00094728.dly")
        );
    }

    #[test]
    fn test_url_for_station_trims_slash() {
        let fetcher = Fetcher::new("https://example.org/all/").unwrap();
        assert_eq!(
            fetcher.url_for(&StationId::new(STATION)),
            "https://example.org/all/USW00094728.dly"
        );
    }

    #[tokio::test]
    async fn test_read_lines_absent_station() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path());
        let lines = cache
            .read_lines(&StationId::new(STATION), &tmax())
            .await
            .unwrap();
        assert!(lines.is_none());
    }

    #[tokio::test]
    async fn test_read_lines_filters_element() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path());
        let content = [
            full_month_line(STATION, 2012, 3, "TMAX", 100),
            full_month_line(STATION, 2012, 3, "PRCP", 0),
            "SHORT".to_string(),
            full_month_line(STATION, 2012, 4, "TMAX", 110),
        ]
        .join("\n");
        std::fs::write(cache.path_for(&StationId::new(STATION)), content).unwrap();

        let lines = cache
            .read_lines(&StationId::new(STATION), &tmax())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| !l.contains("PRCP")));
    }

    #[tokio::test]
    async fn test_load_skips_uncached_stations() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path());
        let present = StationId::new(STATION);
        let absent = StationId::new("USC00000001");
        std::fs::write(
            cache.path_for(&present),
            full_month_line(STATION, 2012, 3, "TMAX", 100),
        )
        .unwrap();

        let raw = cache
            .load(
                &[present.clone(), absent.clone()],
                &tmax(),
                &ProgressReporter::hidden(),
            )
            .await
            .unwrap();
        assert!(raw.contains(&present));
        assert!(!raw.contains(&absent));
        assert_eq!(raw.line_count(), 1);
    }

    #[tokio::test]
    async fn test_load_keeps_valid_lines_of_non_utf8_file() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path());
        let clean = StationId::new(STATION);
        let damaged = StationId::new("USC00000001");
        std::fs::write(
            cache.path_for(&clean),
            full_month_line(STATION, 2012, 3, "TMAX", 100),
        )
        .unwrap();

        let mut bytes = full_month_line("USC00000001", 2012, 3, "TMAX", 90).into_bytes();
        bytes.push(b'\n');
        bytes.extend_from_slice(&full_month_line("USC00000001", 2012, 4, "TMAX", 95).into_bytes());
        bytes.extend_from_slice(b"\xff\xfe");
        std::fs::write(cache.path_for(&damaged), bytes).unwrap();

        let raw = cache
            .load(
                &[clean.clone(), damaged.clone()],
                &tmax(),
                &ProgressReporter::hidden(),
            )
            .await
            .unwrap();
        assert!(raw.contains(&clean));
        assert!(raw.contains(&damaged));
        assert_eq!(raw.line_count(), 3);

        let lines = cache.read_lines(&damaged, &tmax()).await.unwrap().unwrap();
        assert_eq!(lines[0], full_month_line("USC00000001", 2012, 3, "TMAX", 90));
        assert!(lines[1].contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_load_treats_unreadable_file_as_missing() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path());
        let present = StationId::new(STATION);
        let unreadable = StationId::new("USC00000001");
        std::fs::write(
            cache.path_for(&present),
            full_month_line(STATION, 2012, 3, "TMAX", 100),
        )
        .unwrap();
        // A directory at the station path exists but cannot be read as a file
        std::fs::create_dir(cache.path_for(&unreadable)).unwrap();

        let err = cache.read_lines(&unreadable, &tmax()).await.unwrap_err();
        assert!(matches!(err, AuditError::StationFileUnreadable { .. }));

        let raw = cache
            .load(
                &[present.clone(), unreadable.clone()],
                &tmax(),
                &ProgressReporter::hidden(),
            )
            .await
            .unwrap();
        assert!(raw.contains(&present));
        assert!(!raw.contains(&unreadable));
        assert_eq!(raw.line_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_missing_skips_cached_files() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path());
        let station = StationId::new(STATION);
        std::fs::write(cache.path_for(&station), "").unwrap();

        // Unroutable base URL: any network attempt would fail the assertion
        let fetcher = Fetcher::new("http://127.0.0.1:9").unwrap();
        let summary = fetcher
            .fetch_missing(&cache, &[station], &ProgressReporter::hidden())
            .await
            .unwrap();
        assert_eq!(summary.already_cached, 1);
        assert_eq!(summary.downloaded, 0);
        assert!(summary.failed.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let cache = StationFileCache::new(dir.path().join("dly"));
        let station = StationId::new(STATION);

        let fetcher = Fetcher::new("http://127.0.0.1:9").unwrap();
        let summary = fetcher
            .fetch_missing(&cache, &[station.clone()], &ProgressReporter::hidden())
            .await
            .unwrap();
        assert_eq!(summary.failed, vec![station.clone()]);
        assert!(!cache.is_cached(&station));
        let leftovers: Vec<_> = std::fs::read_dir(cache.dir()).unwrap().collect();
        assert!(leftovers.is_empty());
    }
}
