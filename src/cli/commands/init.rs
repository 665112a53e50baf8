//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "scholarmap.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::starter_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your data file locations", self.output);
                println!("  2. Validate: scholarmap validate-config");
                println!("  3. Run: scholarmap locate");
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Starter configuration template
    fn starter_config() -> &'static str {
        r#"# Scholar Map configuration

[application]
name = "scholarmap"
log_level = "info"

[data]
# Citing-author records produced by the scraping step
authors_file = "output/authors.json"
# National institution registry (CSV with name/alias/address/website columns)
national_registry = "data/colleges_and_universities.csv"
# Global institution registry (JSON with domains/web_pages per institution)
global_registry = "data/world_universities_and_domains.json"
# Local IP-geolocation store (CSV of integer address ranges)
ip_location_db = "data/ip2location-lite.csv"
# IP-block to organization table (CSV with CIDR and organization columns)
ip_org_blocks = "data/ip2location-asn.csv"

[geocoder]
base_url = "https://nominatim.openstreetmap.org"
user_agent = "scholarmap"
request_timeout_seconds = 30

[output]
directory = "output"
locations_file = "locations.csv"

[logging]
local_enabled = false
local_path = "logs"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_config_parses_and_validates() {
        let config: crate::config::ScholarMapConfig =
            toml::from_str(InitArgs::starter_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.name, "scholarmap");
    }
}
