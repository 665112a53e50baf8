//! Global institution registry
//!
//! JSON registry of institutions worldwide, each row carrying the
//! institution's domains and web pages but only coarse location data
//! (country and state/province, no coordinates). A hit here is either
//! cross-referenced into the national registry for precise geodata or
//! geocoded from the institution name.

use crate::domain::{Result, ScholarMapError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One global registry row, with the source data's external field names.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalRow {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, rename = "state-province")]
    pub state_province: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub web_pages: Vec<String>,
}

/// In-memory global registry, loaded once at startup.
#[derive(Debug, Clone)]
pub struct GlobalRegistry {
    rows: Vec<GlobalRow>,
}

impl GlobalRegistry {
    /// Loads the registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarMapError::Registry`] if the file is missing or
    /// cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ScholarMapError::Registry(format!(
                "Global registry not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let rows: Vec<GlobalRow> = serde_json::from_str(&contents)
            .map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;

        tracing::info!(
            count = rows.len(),
            path = %path.display(),
            "Loaded global institution registry"
        );
        Ok(Self { rows })
    }

    /// Builds a registry directly from rows. Test seam.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<GlobalRow>) -> Self {
        Self { rows }
    }

    /// Finds the first institution whose domain list or web-page list
    /// contains the candidate domain as a substring.
    pub fn lookup_domain(&self, domain: &str) -> Option<&GlobalRow> {
        if domain.is_empty() {
            return None;
        }
        self.rows.iter().find(|row| {
            row.domains.iter().any(|d| d.contains(domain))
                || row.web_pages.iter().any(|w| w.contains(domain))
        })
    }

    /// Iterates all institution names (for the known-institution index).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.name.as_str())
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_json() {
        let json = r#"[
            {"name": "University of Tokyo", "country": "Japan",
             "state-province": null,
             "domains": ["u-tokyo.ac.jp"],
             "web_pages": ["http://www.u-tokyo.ac.jp/"]}
        ]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let registry = GlobalRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        let row = registry.lookup_domain("u-tokyo.ac.jp").unwrap();
        assert_eq!(row.name, "University of Tokyo");
        assert_eq!(row.state_province, None);
    }

    #[test]
    fn test_lookup_domain_matches_web_pages_substring() {
        let registry = GlobalRegistry::from_rows(vec![GlobalRow {
            name: "ETH Zurich".to_string(),
            country: "Switzerland".to_string(),
            state_province: None,
            domains: vec![],
            web_pages: vec!["https://www.ethz.ch/en.html".to_string()],
        }]);
        assert!(registry.lookup_domain("ethz.ch").is_some());
        assert!(registry.lookup_domain("epfl.ch").is_none());
    }

    #[test]
    fn test_lookup_empty_domain() {
        let registry = GlobalRegistry::from_rows(vec![]);
        assert!(registry.lookup_domain("").is_none());
    }
}
