//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line overrides applied by the caller.
//!
//! ```toml
//! cache_dir = "/data/ghcnd/dly"
//! output_dir = "reports"
//! export_format = "parquet"
//! parallel_decode = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_INVENTORY_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_STATIONS_FILE,
    FALLBACK_CACHE_DIR,
};
use crate::error::{AuditError, Result};
use crate::export::ExportFormat;

/// Application directory name under the platform cache/config roots
const APP_DIR: &str = "ghcnd-audit";

/// Global configuration for an audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Directory holding cached `.dly` station files
    pub cache_dir: PathBuf,

    /// Directory receiving exported tables
    pub output_dir: PathBuf,

    /// Station metadata file (`ghcnd-stations.txt`)
    pub stations_file: PathBuf,

    /// Station inventory file (`ghcnd-inventory.txt`)
    pub inventory_file: PathBuf,

    /// Archive directory station files are downloaded from
    pub base_url: String,

    /// Download station files that are not cached yet
    pub download: bool,

    /// Decode stations on the rayon thread pool
    pub parallel_decode: bool,

    pub export_format: ExportFormat,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            stations_file: PathBuf::from(DEFAULT_STATIONS_FILE),
            inventory_file: PathBuf::from(DEFAULT_INVENTORY_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
            download: true,
            parallel_decode: false,
            export_format: ExportFormat::default(),
        }
    }
}

/// Platform cache directory for station files, `dly_files` when unavailable
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR).join("dly"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}

impl AuditConfig {
    /// Default location of the optional config file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AuditError::configuration(format!("Invalid config file: {}", e)))
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuditError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, overlaid by `config_file` when one is given.
    ///
    /// Without an explicit file the default config path is used if it exists.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::load(path),
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::load(&path),
                None => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(AuditError::configuration("base_url must not be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AuditError::configuration(format!(
                "base_url must be an http(s) URL: {}",
                base_url
            )));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(AuditError::configuration("cache_dir must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(AuditError::configuration("output_dir must not be empty"));
        }
        Ok(())
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_stations_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stations_file = path.into();
        self
    }

    pub fn with_inventory_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.inventory_file = path.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use only files already in the cache
    pub fn without_download(mut self) -> Self {
        self.download = false;
        self
    }

    pub fn with_parallel_decode(mut self, parallel: bool) -> Self {
        self.parallel_decode = parallel;
        self
    }

    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AuditConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.download);
        assert!(!config.parallel_decode);
        assert_eq!(config.export_format, ExportFormat::Csv);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.stations_file, PathBuf::from("ghcnd-stations.txt"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AuditConfig::from_toml_str(
            r#"
            output_dir = "reports"
            export_format = "parquet"
            parallel_decode = true
            "#,
        )
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.export_format, ExportFormat::Parquet);
        assert!(config.parallel_decode);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_toml() {
        let err = AuditConfig::from_toml_str("export_format = \"xlsx\"").unwrap_err();
        assert!(matches!(err, AuditError::Configuration { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cache_dir = \"/data/dly\"").unwrap();
        writeln!(file, "download = false").unwrap();

        let config = AuditConfig::load_layered(Some(file.path())).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/data/dly"));
        assert!(!config.download);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = AuditConfig::load(Path::new("/nonexistent/ghcnd-audit.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        assert!(AuditConfig::default().with_base_url("").validate().is_err());
        assert!(
            AuditConfig::default()
                .with_base_url("ftp://ftp.ncdc.noaa.gov")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = AuditConfig::default()
            .with_cache_dir("/tmp/cache")
            .with_output_dir("/tmp/out")
            .without_download()
            .with_parallel_decode(true)
            .with_export_format(ExportFormat::Parquet);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.download);
        assert!(config.parallel_decode);
        assert_eq!(config.export_format, ExportFormat::Parquet);
    }
}
