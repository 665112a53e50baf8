//! Core domain models
//!
//! This module defines the two records the pipeline revolves around: the
//! citing-author record consumed from the authors file, and the institution
//! record produced per resolved email domain.

use serde::{Deserialize, Serialize};

/// Sentinel stored by the citation-graph scraper when an author entered no
/// affiliation on their profile.
pub const UNKNOWN_AFFILIATION: &str = "Unknown affiliation";

/// One citing author, as read from the authors file.
///
/// Authors without a scholar profile carry only a `name`; `email_domain` and
/// `affiliation` are then absent and the author is skipped by the pipeline.
/// The record is immutable input; resolution never writes back to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorRecord {
    /// Author display name
    #[serde(default)]
    pub name: String,

    /// Verified email domain from the author's profile, usually prefixed
    /// with `@` (e.g. `@cs.stanford.edu`)
    #[serde(default)]
    pub email_domain: Option<String>,

    /// Free-text affiliation from the author's profile; may be the literal
    /// [`UNKNOWN_AFFILIATION`] sentinel
    #[serde(default)]
    pub affiliation: Option<String>,
}

impl AuthorRecord {
    /// Whether this author carries the fields the resolution cascade needs.
    ///
    /// Authors scraped without a scholar profile have neither an email
    /// domain nor an affiliation and cannot be resolved.
    pub fn has_scholar_data(&self) -> bool {
        self.email_domain.is_some() && self.affiliation.is_some()
    }
}

/// The canonical institution resolved for one email domain.
///
/// One record exists per domain in the resolution cache. A record is created
/// once by whichever cascade source succeeded, and may be mutated exactly
/// once more by the correction pass, which can overwrite `name`.
///
/// `country` is always stored as a normalized lowercase string; title-casing
/// happens only when the report is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InstitutionRecord {
    /// Normalized email domain this record was resolved for
    pub domain: String,

    /// Canonical institution name, if any source produced one
    pub name: Option<String>,

    /// Normalized lowercase country name
    pub country: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees
    pub longitude: Option<f64>,

    /// Street address or geocoder formatted address
    pub address: Option<String>,

    /// City name
    pub city: Option<String>,

    /// State / region / province
    pub state: Option<String>,

    /// Postal code
    pub zip: Option<String>,
}

impl InstitutionRecord {
    /// Creates an empty record keyed by the given domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// Whether the record carries usable coordinates.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_without_scholar_data() {
        let author = AuthorRecord {
            name: "J. Doe".to_string(),
            email_domain: None,
            affiliation: None,
        };
        assert!(!author.has_scholar_data());
    }

    #[test]
    fn test_author_with_scholar_data() {
        let author = AuthorRecord {
            name: "J. Doe".to_string(),
            email_domain: Some("@cs.stanford.edu".to_string()),
            affiliation: Some("Stanford University".to_string()),
        };
        assert!(author.has_scholar_data());
    }

    #[test]
    fn test_author_deserializes_with_missing_fields() {
        let author: AuthorRecord = serde_json::from_str(r#"{"name": "J. Doe"}"#).unwrap();
        assert_eq!(author.name, "J. Doe");
        assert!(author.email_domain.is_none());
        assert!(author.affiliation.is_none());
    }

    #[test]
    fn test_institution_record_new() {
        let record = InstitutionRecord::new("mit.edu");
        assert_eq!(record.domain, "mit.edu");
        assert!(record.name.is_none());
        assert!(!record.has_coordinates());
    }

    #[test]
    fn test_institution_record_coordinates() {
        let record = InstitutionRecord {
            latitude: Some(42.36),
            longitude: Some(-71.09),
            ..InstitutionRecord::new("mit.edu")
        };
        assert!(record.has_coordinates());
    }
}
