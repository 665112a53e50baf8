//! Locations report writer
//!
//! Serializes the resolution cache to the locations CSV consumed by the
//! downstream impact-chart step. This file is the sole interface to that
//! collaborator: one row per resolved domain, sorted by
//! `(country, name, domain)`, with name and country title-cased and every
//! non-numeric field quoted.

use crate::core::normalize::title_case;
use crate::core::resolve::ResolutionCache;
use crate::domain::{Result, ScholarMapError};
use serde::Serialize;
use std::path::Path;

/// One output row. Field order defines the CSV column order.
#[derive(Debug, Serialize, PartialEq)]
struct LocationRow {
    country: String,
    name: String,
    domain: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: String,
    city: String,
    state: String,
    zip: String,
}

impl LocationRow {
    fn from_cache(record: &crate::domain::InstitutionRecord) -> Self {
        Self {
            country: title_case(record.country.as_deref().unwrap_or("")),
            name: title_case(record.name.as_deref().unwrap_or("")),
            domain: record.domain.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            address: record.address.clone().unwrap_or_default(),
            city: record.city.clone().unwrap_or_default(),
            state: record.state.clone().unwrap_or_default(),
            zip: record.zip.clone().unwrap_or_default(),
        }
    }
}

/// Writes the locations report and returns the number of rows written.
///
/// # Errors
///
/// Returns [`ScholarMapError::Report`] if the file cannot be written.
pub fn write_locations(cache: &ResolutionCache, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let mut rows: Vec<LocationRow> = cache.records().map(LocationRow::from_cache).collect();
    rows.sort_by(|a, b| {
        (&a.country, &a.name, &a.domain).cmp(&(&b.country, &b.name, &b.domain))
    });

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_path(path)
        .map_err(|e| ScholarMapError::Report(format!("{}: {e}", path.display())))?;
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| ScholarMapError::Report(format!("{}: {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| ScholarMapError::Report(format!("{}: {e}", path.display())))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "Saved location data");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstitutionRecord;
    use tempfile::tempdir;

    fn record(domain: &str, name: &str, country: &str) -> InstitutionRecord {
        InstitutionRecord {
            name: Some(name.to_string()),
            country: Some(country.to_string()),
            latitude: Some(1.0),
            longitude: Some(2.0),
            ..InstitutionRecord::new(domain)
        }
    }

    #[test]
    fn test_write_locations_sorted_and_title_cased() {
        let mut cache = ResolutionCache::new();
        cache.put(record("utokyo.jp", "university of tokyo", "japan"), None);
        cache.put(record("mit.edu", "massachusetts institute of technology", "united states"), None);
        cache.put(record("stanford.edu", "stanford university", "united states"), None);

        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.csv");
        let written = write_locations(&cache, &path).unwrap();
        assert_eq!(written, 3);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "\"country\",\"name\",\"domain\",\"latitude\",\"longitude\",\"address\",\"city\",\"state\",\"zip\""
        );
        // Japan sorts before United States; MIT before Stanford within a country
        assert!(lines[1].starts_with("\"Japan\",\"University of Tokyo\",\"utokyo.jp\",1.0,2.0"));
        assert!(lines[2].starts_with("\"United States\",\"Massachusetts Institute of Technology\",\"mit.edu\""));
        assert!(lines[3].starts_with("\"United States\",\"Stanford University\",\"stanford.edu\""));
    }

    #[test]
    fn test_write_locations_empty_fields() {
        let mut cache = ResolutionCache::new();
        cache.put(InstitutionRecord::new("unknown.org"), None);

        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.csv");
        write_locations(&cache, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        // absent coordinates serialize as empty fields, quoted like every
        // other non-numeric value
        assert_eq!(
            lines[1],
            "\"\",\"\",\"unknown.org\",\"\",\"\",\"\",\"\",\"\",\"\""
        );
    }
}
