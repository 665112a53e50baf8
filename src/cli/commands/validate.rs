//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Scholar Map configuration file and checking that every reference
//! data file it names exists.

use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                config
            }
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Geocoder: {}", config.geocoder.base_url);
        println!(
            "  Geocoder timeout: {}s",
            config.geocoder.request_timeout_seconds
        );
        println!(
            "  Output: {}/{}",
            config.output.directory, config.output.locations_file
        );

        println!();
        println!("Reference data:");
        let mut missing = 0;
        let entries = [
            ("Authors file", &config.data.authors_file),
            ("National registry", &config.data.national_registry),
            ("Global registry", &config.data.global_registry),
            ("IP-geolocation store", &config.data.ip_location_db),
            ("IP-block organizations", &config.data.ip_org_blocks),
        ];
        for (label, path) in entries {
            if Path::new(path).is_file() {
                println!("  {label}: {path}");
            } else {
                println!("  {label}: {path} (MISSING)");
                missing += 1;
            }
        }

        if missing > 0 {
            println!();
            println!("{missing} reference file(s) missing; a locate run would abort at startup");
            return Ok(2);
        }
        Ok(0)
    }
}
