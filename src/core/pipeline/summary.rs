//! Run summary and reporting
//!
//! Tracks per-run statistics: how many authors were processed, how many
//! resolved, and what the correction pass and report writer did.

use std::time::Duration;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Total author records in the authors file
    pub total_authors: usize,

    /// Authors skipped for lacking scholar data (no domain/affiliation)
    pub skipped_authors: usize,

    /// Authors resolved to an institution record
    pub resolved_authors: usize,

    /// Authors that reached the `Unresolved` terminal state
    pub unresolved_authors: usize,

    /// Unique domains in the resolution cache at the end of the main loop
    pub unique_domains: usize,

    /// Records renamed by the majority correction pass
    pub corrected_domains: usize,

    /// Rows written to the locations report
    pub records_written: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Authors that carried scholar data and entered the cascade.
    pub fn processed_authors(&self) -> usize {
        self.resolved_authors + self.unresolved_authors
    }

    /// Share of processed authors that resolved, as a percentage.
    pub fn resolution_rate(&self) -> f64 {
        if self.processed_authors() == 0 {
            return 100.0;
        }
        (self.resolved_authors as f64 / self.processed_authors() as f64) * 100.0
    }

    /// Logs the summary.
    pub fn log_summary(&self) {
        tracing::info!(
            total_authors = self.total_authors,
            skipped = self.skipped_authors,
            resolved = self.resolved_authors,
            unresolved = self.unresolved_authors,
            unique_domains = self.unique_domains,
            corrected = self.corrected_domains,
            records_written = self.records_written,
            duration_secs = self.duration.as_secs(),
            resolution_rate = self.resolution_rate(),
            "Run complete"
        );
    }
}
