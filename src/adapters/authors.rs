//! Authors file loader
//!
//! The citing-author records are produced by an upstream scraping step and
//! handed to this tool as a JSON file mapping author id → record. This
//! module is the interface boundary to that collaborator: it only reads the
//! fields the resolution cascade needs and ignores everything else the
//! scraper stored.

use crate::domain::{AuthorRecord, Result, ScholarMapError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Loads the authors file.
///
/// Returns the records keyed by author id in a `BTreeMap` so iteration
/// order (and therefore cache-observation order) is deterministic across
/// runs.
///
/// # Errors
///
/// Returns [`ScholarMapError::Configuration`] if the file does not exist,
/// and [`ScholarMapError::Serialization`] if it cannot be parsed.
pub fn load_authors(path: impl AsRef<Path>) -> Result<BTreeMap<String, AuthorRecord>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ScholarMapError::Configuration(format!(
            "Authors file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)?;
    let authors: BTreeMap<String, AuthorRecord> = serde_json::from_str(&contents)?;

    tracing::info!(
        count = authors.len(),
        path = %path.display(),
        "Loaded citing-author records"
    );
    Ok(authors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_authors() {
        let json = r#"{
            "a1": {"name": "Ada", "email_domain": "@mit.edu", "affiliation": "MIT CSAIL"},
            "a2": {"name": "Ben"}
        }"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let authors = load_authors(file.path()).unwrap();
        assert_eq!(authors.len(), 2);
        assert!(authors["a1"].has_scholar_data());
        assert!(!authors["a2"].has_scholar_data());
    }

    #[test]
    fn test_load_authors_ignores_extra_fields() {
        let json = r#"{
            "a1": {"name": "Ada", "email_domain": "@mit.edu", "affiliation": "MIT",
                   "citedby": 120, "interests": ["ai"]}
        }"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let authors = load_authors(file.path()).unwrap();
        assert_eq!(authors["a1"].email_domain.as_deref(), Some("@mit.edu"));
    }

    #[test]
    fn test_load_authors_missing_file() {
        let result = load_authors("no-such-authors.json");
        assert!(matches!(result, Err(ScholarMapError::Configuration(_))));
    }
}
