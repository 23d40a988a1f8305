//! Application constants for the GHCN-Daily auditor
//!
//! Field offsets of the fixed-width formats, sentinel values, default paths
//! and the element codes recognised by the source feed.

// =============================================================================
// `.dly` Record Layout
// =============================================================================

/// Fixed-width layout of one GHCN-Daily station-month line
pub mod dly_layout {
    use std::ops::Range;

    /// Station identifier, 11 characters
    pub const STATION_ID: Range<usize> = 0..11;

    /// Year, 4 digits
    pub const YEAR: Range<usize> = 11..15;

    /// Month, 2 digits
    pub const MONTH: Range<usize> = 15..17;

    /// Element (variable) code, 4 characters
    pub const ELEMENT: Range<usize> = 17..21;

    /// Offset of the first day slot
    pub const FIRST_SLOT: usize = 21;

    /// Width of one day slot: 5-character value plus three flag characters
    pub const SLOT_WIDTH: usize = 8;

    /// Width of the integer value at the start of each slot
    pub const VALUE_WIDTH: usize = 5;

    /// Day slots carried by every line regardless of month length
    pub const SLOTS_PER_LINE: usize = 31;

    /// Minimum width needed to read the header fields
    pub const HEADER_WIDTH: usize = ELEMENT.end;

    /// Full width of a well-formed line
    pub const LINE_WIDTH: usize = FIRST_SLOT + SLOTS_PER_LINE * SLOT_WIDTH;
}

/// Value printed in a day slot when no observation exists
pub const MISSING_SENTINEL: i32 = -9999;

// =============================================================================
// Station Metadata Layout
// =============================================================================

/// Fixed-width layout of `ghcnd-stations.txt`
pub mod stations_layout {
    use std::ops::Range;

    pub const ID: Range<usize> = 0..11;
    pub const LATITUDE: Range<usize> = 12..20;
    pub const LONGITUDE: Range<usize> = 21..30;
    pub const ELEVATION: Range<usize> = 31..37;
    pub const STATE: Range<usize> = 38..40;
    pub const NAME: Range<usize> = 41..71;
}

// =============================================================================
// Element Codes
// =============================================================================

/// Width of every element code in the feed
pub const ELEMENT_CODE_WIDTH: usize = 4;

/// Core elements offered by the command line
pub const CORE_ELEMENTS: &[&str] = &["TMAX", "TMIN", "PRCP", "TAVG", "SNOW", "SNWD"];

// =============================================================================
// Defaults
// =============================================================================

/// Directory listing every station file of the feed
pub const DEFAULT_BASE_URL: &str = "https://www.ncei.noaa.gov/pub/data/ghcn/daily/all";

/// Station metadata file name
pub const DEFAULT_STATIONS_FILE: &str = "ghcnd-stations.txt";

/// Station inventory file name
pub const DEFAULT_INVENTORY_FILE: &str = "ghcnd-inventory.txt";

/// Cache directory used when no platform cache directory is available
pub const FALLBACK_CACHE_DIR: &str = "dly_files";

/// Default directory for exported tables
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Extension of cached station files
pub const STATION_FILE_EXTENSION: &str = "dly";

/// Separator used when flattening missing-station lists into one cell
pub const MISSING_ID_SEPARATOR: &str = ", ";
