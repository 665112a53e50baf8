//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Scholar Map using
//! clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Scholar Map - citing-author institution resolution
#[derive(Parser, Debug)]
#[command(name = "scholarmap")]
#[command(version, about, long_about = None)]
#[command(author = "Scholar Map Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "scholarmap.toml", env = "SCHOLARMAP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SCHOLARMAP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve citing-author affiliations and write the locations report
    Locate(commands::locate::LocateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_locate() {
        let cli = Cli::parse_from(["scholarmap", "locate"]);
        assert_eq!(cli.config, "scholarmap.toml");
        assert!(matches!(cli.command, Commands::Locate(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["scholarmap", "--config", "custom.toml", "locate"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["scholarmap", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["scholarmap", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
