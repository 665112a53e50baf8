//! Configuration schema types
//!
//! This module defines the configuration structure for Scholar Map.

use serde::{Deserialize, Serialize};

/// Main Scholar Map configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarMapConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Reference data file locations
    pub data: DataConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScholarMapConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.data.validate()?;
        self.geocoder.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.log_level
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Reference data file locations
///
/// Every file named here must exist at startup; a missing reference file
/// is fatal and aborts the run before any author is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Citing-author records (JSON map of author id → record)
    pub authors_file: String,

    /// National institution registry (CSV)
    pub national_registry: String,

    /// Global institution registry (JSON)
    pub global_registry: String,

    /// Local IP-geolocation store (CSV of integer ranges)
    pub ip_location_db: String,

    /// IP-block → organization table (CSV)
    pub ip_org_blocks: String,
}

impl DataConfig {
    fn validate(&self) -> Result<(), String> {
        let entries = [
            ("data.authors_file", &self.authors_file),
            ("data.national_registry", &self.national_registry),
            ("data.global_registry", &self.global_registry),
            ("data.ip_location_db", &self.ip_location_db),
            ("data.ip_org_blocks", &self.ip_org_blocks),
        ];
        for (key, value) in entries {
            if value.trim().is_empty() {
                return Err(format!("{key} must not be empty"));
            }
        }
        Ok(())
    }
}

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-style geocoding service
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User agent sent with every geocoding request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout; a hung geocoding call must not stall the batch
    #[serde(default = "default_geocoder_timeout")]
    pub request_timeout_seconds: u64,
}

impl GeocoderConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "geocoder.base_url must be an http(s) URL, got: {}",
                self.base_url
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err("geocoder.request_timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            request_timeout_seconds: default_geocoder_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the report is written to (created if missing)
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Locations report file name
    #[serde(default = "default_locations_file")]
    pub locations_file: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.trim().is_empty() {
            return Err("output.directory must not be empty".to_string());
        }
        if self.locations_file.trim().is_empty() {
            return Err("output.locations_file must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            locations_file: default_locations_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to also log to a rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
        }
    }
}

fn default_app_name() -> String {
    "scholarmap".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "scholarmap".to_string()
}

fn default_geocoder_timeout() -> u64 {
    30
}

fn default_output_directory() -> String {
    "output".to_string()
}

fn default_locations_file() -> String {
    "locations.csv".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}
