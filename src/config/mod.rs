//! Configuration management for Scholar Map.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Scholar Map uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`SCHOLARMAP_*`)
//! - Default values for optional settings
//! - Validation at load time
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scholarmap::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("scholarmap.toml")?;
//!
//! println!("Authors file: {}", config.data.authors_file);
//! println!("Geocoder: {}", config.geocoder.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DataConfig, GeocoderConfig, LoggingConfig, OutputConfig, ScholarMapConfig,
};
