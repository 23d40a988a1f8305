//! Station metadata, inventory and regional selection.
//!
//! Parses `ghcnd-stations.txt` (fixed width) and `ghcnd-inventory.txt`
//! (whitespace separated), filters stations to a bounding box and keeps
//! those whose inventory covers the element during the query range.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::stations_layout;
use crate::error::{AuditError, Result};
use crate::models::{DateRange, Element, StationId};

// =============================================================================
// Station Metadata
// =============================================================================

/// One entry of the station metadata file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub state: Option<String>,
    pub name: String,
}

/// Parse one fixed-width metadata line; `None` when the line is unusable
pub fn parse_station_line(line: &str) -> Option<Station> {
    let id = line.get(stations_layout::ID)?.trim();
    if id.is_empty() {
        return None;
    }
    let latitude = line.get(stations_layout::LATITUDE)?.trim().parse().ok()?;
    let longitude = line.get(stations_layout::LONGITUDE)?.trim().parse().ok()?;
    let elevation = line
        .get(stations_layout::ELEVATION)
        .and_then(|s| s.trim().parse().ok());
    let state = line
        .get(stations_layout::STATE)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let name = line
        .get(stations_layout::NAME.start..)
        .map(|rest| rest.get(..stations_layout::NAME.len()).unwrap_or(rest))
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Some(Station {
        id: StationId::new(id),
        latitude,
        longitude,
        elevation,
        state,
        name,
    })
}

/// Parse every usable line, returning the stations and the count of skipped lines
pub fn parse_stations(content: &str) -> (Vec<Station>, usize) {
    let mut stations = Vec::new();
    let mut skipped = 0;
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_station_line(line) {
            Some(station) => stations.push(station),
            None => {
                debug!("stations line {}: unparseable, skipped", index + 1);
                skipped += 1;
            }
        }
    }
    (stations, skipped)
}

// =============================================================================
// Inventory
// =============================================================================

/// Period of record for one station and element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: StationId,
    pub latitude: f64,
    pub longitude: f64,
    pub element: String,
    pub first_year: i32,
    pub last_year: i32,
}

impl InventoryEntry {
    /// True when this entry covers `element` during some year of `range`
    pub fn covers(&self, element: &Element, range: DateRange) -> bool {
        use chrono::Datelike;
        element.matches(&self.element)
            && self.first_year <= range.end().year()
            && self.last_year >= range.start().year()
    }
}

pub fn parse_inventory_line(line: &str) -> Option<InventoryEntry> {
    let mut fields = line.split_whitespace();
    let id = fields.next()?;
    let latitude = fields.next()?.parse().ok()?;
    let longitude = fields.next()?.parse().ok()?;
    let element = fields.next()?;
    let first_year = fields.next()?.parse().ok()?;
    let last_year = fields.next()?.parse().ok()?;

    Some(InventoryEntry {
        id: StationId::new(id),
        latitude,
        longitude,
        element: element.to_string(),
        first_year,
        last_year,
    })
}

/// Parse every usable inventory line, returning the entries and the count of skipped lines
pub fn parse_inventory(content: &str) -> (Vec<InventoryEntry>, usize) {
    let mut entries = Vec::new();
    let mut skipped = 0;
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_inventory_line(line) {
            Some(entry) => entries.push(entry),
            None => {
                debug!("inventory line {}: unparseable, skipped", index + 1);
                skipped += 1;
            }
        }
    }
    (entries, skipped)
}

// =============================================================================
// Bounding Box
// =============================================================================

/// Inclusive latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bbox = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.min_lat, self.max_lat, self.min_lon, self.max_lon];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(AuditError::invalid_bounding_box("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&self.min_lat) || !(-90.0..=90.0).contains(&self.max_lat) {
            return Err(AuditError::invalid_bounding_box(
                "latitude must be between -90 and 90 degrees",
            ));
        }
        if !(-180.0..=180.0).contains(&self.min_lon) || !(-180.0..=180.0).contains(&self.max_lon)
        {
            return Err(AuditError::invalid_bounding_box(
                "longitude must be between -180 and 180 degrees",
            ));
        }
        if self.min_lat > self.max_lat {
            return Err(AuditError::invalid_bounding_box(format!(
                "min latitude {} exceeds max latitude {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon > self.max_lon {
            return Err(AuditError::invalid_bounding_box(format!(
                "min longitude {} exceeds max longitude {}",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Stations inside `bbox` whose inventory lists `element` during `range`.
///
/// Metadata file order is kept and each identifier appears once.
pub fn select_stations(
    stations: &[Station],
    inventory: &[InventoryEntry],
    bbox: &BoundingBox,
    element: &Element,
    range: DateRange,
) -> Vec<Station> {
    let eligible: HashSet<&StationId> = inventory
        .iter()
        .filter(|entry| entry.covers(element, range))
        .map(|entry| &entry.id)
        .collect();
    debug!("Inventory lists {} stations with {}", eligible.len(), element);

    let in_box: Vec<&Station> = stations
        .iter()
        .filter(|s| bbox.contains(s.latitude, s.longitude))
        .collect();
    debug!("{} stations fall inside the bounding box", in_box.len());

    let mut seen = HashSet::new();
    let selected: Vec<Station> = in_box
        .into_iter()
        .filter(|s| eligible.contains(&s.id) && seen.insert(s.id.clone()))
        .cloned()
        .collect();

    info!("Selected {} stations", selected.len());
    selected
}

/// Read and parse the station metadata file
pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let content = read_metadata(path)?;
    let (stations, skipped) = parse_stations(&content);
    info!(
        "Loaded {} stations from {} ({} lines skipped)",
        stations.len(),
        path.display(),
        skipped
    );
    Ok(stations)
}

/// Read and parse the inventory file
pub fn load_inventory(path: &Path) -> Result<Vec<InventoryEntry>> {
    let content = read_metadata(path)?;
    let (entries, skipped) = parse_inventory(&content);
    info!(
        "Loaded {} inventory entries from {} ({} lines skipped)",
        entries.len(),
        path.display(),
        skipped
    );
    Ok(entries)
}

fn read_metadata(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AuditError::MetadataNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const STATIONS: &str = "\
USC00300023  42.1000  -75.9167  253.0 NY BINGHAMTON
USW00094728  40.7789  -73.9692   39.6 NY NEW YORK CNTRL PK TWR          HCN 72506
CA001012475  48.4000 -123.4833   31.0 BC VICTORIA
USC00045555  37.0000 -122.0000   10.0 CA SANTA CRUZ
BADLINE
USW00094728  40.7789  -73.9692   39.6 NY NEW YORK DUPLICATE";

    const INVENTORY: &str = "\
USC00300023  42.1000  -75.9167 TMAX 1893 2005
USW00094728  40.7789  -73.9692 TMAX 1869 2024
USW00094728  40.7789  -73.9692 PRCP 1869 2024
CA001012475  48.4000 -123.4833 TMAX 1898 2024
USC00045555  37.0000 -122.0000 PRCP 1900 2024
broken line";

    fn range_2012() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2012, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2012, 3, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_station_line_fields() {
        let (stations, skipped) = parse_stations(STATIONS);
        assert_eq!(skipped, 1);
        assert_eq!(stations.len(), 5);

        let park = &stations[1];
        assert_eq!(park.id.as_str(), "USW00094728");
        assert_eq!(park.latitude, 40.7789);
        assert_eq!(park.longitude, -73.9692);
        assert_eq!(park.elevation, Some(39.6));
        assert_eq!(park.state.as_deref(), Some("NY"));
        assert_eq!(park.name, "NEW YORK CNTRL PK TWR");
    }

    #[test]
    fn test_short_name_line() {
        let (stations, _) = parse_stations(STATIONS);
        assert_eq!(stations[2].name, "VICTORIA");
        assert_eq!(stations[2].state.as_deref(), Some("BC"));
    }

    #[test]
    fn test_parse_inventory() {
        let (entries, skipped) = parse_inventory(INVENTORY);
        assert_eq!(entries.len(), 5);
        assert_eq!(skipped, 1);
        assert_eq!(entries[0].element, "TMAX");
        assert_eq!(entries[0].first_year, 1893);
        assert_eq!(entries[0].last_year, 2005);
    }

    #[test]
    fn test_inventory_coverage_uses_range_years() {
        let (entries, _) = parse_inventory(INVENTORY);
        let tmax = Element::parse("TMAX").unwrap();
        assert!(!entries[0].covers(&tmax, range_2012()));
        assert!(entries[1].covers(&tmax, range_2012()));
        assert!(!entries[2].covers(&tmax, range_2012()));

        let spanning = DateRange::new(
            NaiveDate::from_ymd_opt(2005, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2006, 1, 31).unwrap(),
        )
        .unwrap();
        assert!(entries[0].covers(&tmax, spanning));
    }

    #[test]
    fn test_bounding_box_validation() {
        assert!(BoundingBox::new(33.0, 45.0, -85.0, -70.0).is_ok());
        assert!(matches!(
            BoundingBox::new(45.0, 33.0, -85.0, -70.0),
            Err(AuditError::InvalidBoundingBox { .. })
        ));
        assert!(BoundingBox::new(33.0, 95.0, -85.0, -70.0).is_err());
        assert!(BoundingBox::new(33.0, 45.0, -70.0, -85.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 45.0, -85.0, -70.0).is_err());
    }

    #[test]
    fn test_bounding_box_is_inclusive() {
        let bbox = BoundingBox::new(33.0, 45.0, -85.0, -70.0).unwrap();
        assert!(bbox.contains(33.0, -85.0));
        assert!(bbox.contains(45.0, -70.0));
        assert!(!bbox.contains(45.1, -75.0));
    }

    #[test]
    fn test_select_stations_joins_box_and_inventory() {
        let (stations, _) = parse_stations(STATIONS);
        let (inventory, _) = parse_inventory(INVENTORY);
        let bbox = BoundingBox::new(33.0, 45.0, -85.0, -70.0).unwrap();
        let tmax = Element::parse("TMAX").unwrap();

        let selected = select_stations(&stations, &inventory, &bbox, &tmax, range_2012());
        let ids: Vec<_> = selected.iter().map(|s| s.id.as_str()).collect();

        // Binghamton ends in 2005, Victoria is outside the box, Santa Cruz has no TMAX
        assert_eq!(ids, vec!["USW00094728"]);
        assert_eq!(selected[0].name, "NEW YORK CNTRL PK TWR");
    }

    #[test]
    fn test_load_missing_metadata_file() {
        let err = load_stations(Path::new("/nonexistent/ghcnd-stations.txt")).unwrap_err();
        assert!(matches!(err, AuditError::MetadataNotFound { .. }));
    }

    #[test]
    fn test_load_files() {
        let mut stations_file = NamedTempFile::new().unwrap();
        write!(stations_file, "{}", STATIONS).unwrap();
        let mut inventory_file = NamedTempFile::new().unwrap();
        write!(inventory_file, "{}", INVENTORY).unwrap();

        assert_eq!(load_stations(stations_file.path()).unwrap().len(), 5);
        assert_eq!(load_inventory(inventory_file.path()).unwrap().len(), 5);
    }
}
