//! Locate command implementation
//!
//! This module implements the `locate` command: one full resolution run
//! over the authors file, ending with the locations report.

use crate::config::load_config;
use crate::core::pipeline::LocateCoordinator;
use clap::Args;

/// Arguments for the locate command
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Override the authors file path
    #[arg(long)]
    pub authors_file: Option<String>,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<String>,
}

impl LocateArgs {
    /// Execute the locate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting locate command");

        let mut config = load_config(config_path)?;

        if let Some(authors_file) = &self.authors_file {
            tracing::info!(authors_file = %authors_file, "Overriding authors file from CLI");
            config.data.authors_file = authors_file.clone();
        }
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output directory from CLI");
            config.output.directory = output.clone();
        }

        let coordinator = LocateCoordinator::new(config);
        let summary = coordinator.run().await?;
        summary.log_summary();

        println!(
            "Resolved {}/{} author affiliations ({} unique institutions, {} skipped)",
            summary.resolved_authors,
            summary.processed_authors(),
            summary.unique_domains,
            summary.skipped_authors,
        );
        println!("Wrote {} location records", summary.records_written);

        Ok(0)
    }
}
