//! Domain error types
//!
//! This module defines the error hierarchy for Scholar Map. All errors are
//! domain-specific and don't expose third-party types. Only fatal conditions
//! are modeled here; a source that merely has no answer for a domain reports
//! that through [`crate::domain::Lookup`], not through an error.

use thiserror::Error;

/// Main Scholar Map error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific failure categories and provides context for error
/// handling. Any of these reaching the pipeline boundary aborts the run.
#[derive(Debug, Error)]
pub enum ScholarMapError {
    /// Configuration-related errors (missing file, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A reference registry could not be loaded or parsed
    #[error("Registry error: {0}")]
    Registry(String),

    /// Geocoding service errors that are not per-query transient failures
    #[error("Geocoder error: {0}")]
    Geocoder(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Report writing errors
    #[error("Report error: {0}")]
    Report(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScholarMapError {
    fn from(err: std::io::Error) -> Self {
        ScholarMapError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScholarMapError {
    fn from(err: serde_json::Error) -> Self {
        ScholarMapError::Serialization(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for ScholarMapError {
    fn from(err: csv::Error) -> Self {
        ScholarMapError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScholarMapError {
    fn from(err: toml::de::Error) -> Self {
        ScholarMapError::Configuration(format!("TOML parse error: {err}"))
    }
}
