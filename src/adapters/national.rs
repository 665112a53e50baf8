//! National institution registry
//!
//! CSV registry of national colleges and universities with precise geodata
//! (street address, city, state, zip, coordinates) and a website column.
//! This is the most trusted source in the cascade: a domain that matches a
//! registry website resolves directly, and global-registry hits are
//! cross-referenced here by name because this registry's geodata is better.

use crate::domain::{InstitutionRecord, Result, ScholarMapError};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// One registry row. `name`, `alias` and `website` are lowercased at load;
/// address fields keep their source casing (they are only echoed into the
/// report). The source CSV carries uppercase headers, hence the aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct NationalRow {
    #[serde(alias = "NAME")]
    pub name: String,
    #[serde(default, alias = "ALIAS")]
    pub alias: String,
    #[serde(default, alias = "ADDRESS")]
    pub address: String,
    #[serde(default, alias = "CITY")]
    pub city: String,
    #[serde(default, alias = "STATE")]
    pub state: String,
    #[serde(default, alias = "ZIP")]
    pub zip: String,
    /// Two-letter national country/territory code
    #[serde(default, alias = "COUNTRY")]
    pub country: String,
    #[serde(alias = "LATITUDE")]
    pub latitude: Option<f64>,
    #[serde(alias = "LONGITUDE")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "WEBSITE")]
    pub website: String,
}

/// Maps the registry's two-letter territory codes to normalized lowercase
/// country names. Codes outside this table yield no country.
fn country_code_name(code: &str) -> Option<&'static str> {
    match code.trim().to_uppercase().as_str() {
        "US" => Some("united states"),
        "PR" => Some("puerto rico"),
        "VI" => Some("virgin islands, us"),
        "FS" => Some("federated states of micronesia"),
        "MP" => Some("northern mariana islands"),
        "AS" => Some("american samoa"),
        "GU" => Some("guam"),
        "MH" => Some("marshall islands"),
        "PW" => Some("palau"),
        _ => None,
    }
}

/// In-memory national registry, loaded once at startup.
#[derive(Debug, Clone)]
pub struct NationalRegistry {
    rows: Vec<NationalRow>,
}

impl NationalRegistry {
    /// Loads the registry from a CSV file.
    ///
    /// Website strings are cleaned for suffix matching: scheme, `www.`
    /// prefix and slashes are stripped and everything is lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarMapError::Registry`] if the file is missing or a
    /// row cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ScholarMapError::Registry(format!(
                "National registry not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;

        let website_noise = Regex::new(r"https?://|www\.|/").unwrap();
        let mut rows = Vec::new();
        for row in reader.deserialize::<NationalRow>() {
            let mut row =
                row.map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;
            row.name = row.name.trim().to_lowercase();
            row.alias = row.alias.trim().to_lowercase();
            row.website = website_noise
                .replace_all(&row.website.to_lowercase(), "")
                .into_owned();
            rows.push(row);
        }

        tracing::info!(
            count = rows.len(),
            path = %path.display(),
            "Loaded national institution registry"
        );
        Ok(Self { rows })
    }

    /// Builds a registry directly from rows. Test seam.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<NationalRow>) -> Self {
        Self { rows }
    }

    /// Finds the institution whose website ends with the candidate domain.
    ///
    /// When several websites share the suffix, the row whose website string
    /// has the shortest remainder after removing the domain wins, so the
    /// most specific match is selected (`cs.stanford.edu` beats
    /// `stanford.edu` when resolving `cs.stanford.edu`).
    pub fn lookup_domain(&self, domain: &str) -> Option<InstitutionRecord> {
        if domain.is_empty() {
            return None;
        }
        let matches: Vec<&NationalRow> = self
            .rows
            .iter()
            .filter(|row| !row.website.is_empty() && row.website.ends_with(domain))
            .collect();
        if matches.len() > 1 {
            tracing::debug!(
                domain,
                candidates = matches.len(),
                "Multiple registry websites match domain, selecting most specific"
            );
        }
        matches
            .into_iter()
            .min_by_key(|row| row.website.replace(domain, "").len())
            .map(|row| self.to_record(row, domain))
    }

    /// Finds a row by case-insensitive containment on name or alias.
    ///
    /// Used to cross-reference a global-registry hit into this registry's
    /// richer geodata. The first matching row is taken.
    pub fn lookup_name(&self, name: &str) -> Option<&NationalRow> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row.name.contains(&needle) || row.alias.contains(&needle))
    }

    /// Converts a registry row into an institution record for a domain.
    pub fn to_record(&self, row: &NationalRow, domain: &str) -> InstitutionRecord {
        InstitutionRecord {
            domain: domain.to_string(),
            name: Some(row.name.clone()),
            country: country_code_name(&row.country).map(str::to_string),
            latitude: row.latitude,
            longitude: row.longitude,
            address: Some(row.address.clone()).filter(|s| !s.is_empty()),
            city: Some(row.city.clone()).filter(|s| !s.is_empty()),
            state: Some(row.state.clone()).filter(|s| !s.is_empty()),
            zip: Some(row.zip.clone()).filter(|s| !s.is_empty()),
        }
    }

    /// Iterates all institution names (for the known-institution index).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.name.as_str())
    }

    /// Iterates all city names (for the place-name index).
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.city.as_str())
    }

    /// Number of rows loaded.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
