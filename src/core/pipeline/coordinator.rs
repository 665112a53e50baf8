//! Pipeline coordinator - main orchestrator for a resolution run
//!
//! This module coordinates the run lifecycle: loading the authors file and
//! every reference source, resolving authors strictly sequentially, running
//! the majority correction pass, and writing the locations report.

use crate::adapters::authors::load_authors;
use crate::adapters::geocoder::GeocoderClient;
use crate::adapters::global::GlobalRegistry;
use crate::adapters::ipgeo::{GeoIpStore, NetworkLocator, OrgBlocks};
use crate::adapters::national::NationalRegistry;
use crate::config::ScholarMapConfig;
use crate::core::affiliation::{KnownInstitutions, PlaceNames};
use crate::core::normalize::{tld_country_names, CountryEquivalence};
use crate::core::pipeline::report::write_locations;
use crate::core::pipeline::summary::RunSummary;
use crate::core::resolve::Resolver;
use crate::domain::Result;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Pipeline coordinator
pub struct LocateCoordinator {
    config: ScholarMapConfig,
}

impl LocateCoordinator {
    /// Creates a coordinator for the given configuration.
    pub fn new(config: ScholarMapConfig) -> Self {
        Self { config }
    }

    /// Executes one resolution run.
    ///
    /// 1. Loads the authors file and all reference data; a missing file is
    ///    fatal and aborts before any author is processed.
    /// 2. Resolves every author with scholar data, one at a time: each
    ///    resolution chain completes before the next begins, because the
    ///    cache is shared mutable state.
    /// 3. Runs the majority correction pass over the accumulated cache.
    /// 4. Writes the locations report and returns the run summary.
    pub async fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();

        let authors = load_authors(&self.config.data.authors_file)?;
        let national = NationalRegistry::load(&self.config.data.national_registry)?;
        let global = GlobalRegistry::load(&self.config.data.global_registry)?;
        let store = GeoIpStore::load(&self.config.data.ip_location_db)?;
        let orgs = OrgBlocks::load(&self.config.data.ip_org_blocks)?;
        let geocoder = GeocoderClient::new(&self.config.geocoder)?;
        let countries = CountryEquivalence::default();

        let known = KnownInstitutions::new(
            national
                .names()
                .map(str::to_string)
                .chain(global.names().map(str::to_string)),
        );
        let places = PlaceNames::new(
            national.cities().map(str::to_string),
            tld_country_names()
                .map(str::to_string)
                .chain(countries.known_spellings().map(str::to_string)),
        );
        tracing::info!(
            institutions = known.len(),
            "Built known-institution and place-name indices"
        );

        let mut resolver = Resolver::new(
            national,
            global,
            NetworkLocator::new(store, orgs),
            geocoder,
            countries,
            known,
            places,
        );

        let mut summary = RunSummary::new();
        summary.total_authors = authors.len();

        tracing::info!("Resolving affiliation and location for each author");
        for (author_id, author) in &authors {
            if !author.has_scholar_data() {
                tracing::info!(author = %author.name, "No scholar data for author, skipping");
                summary.skipped_authors += 1;
                continue;
            }
            tracing::debug!(author = %author.name, "Processing author");
            match resolver.resolve(author).await {
                Some(_) => summary.resolved_authors += 1,
                None => {
                    tracing::info!(author_id = %author_id, "Could not resolve author affiliation");
                    summary.unresolved_authors += 1;
                }
            }
        }
        summary.unique_domains = resolver.cache().len();
        tracing::info!(
            resolved = summary.resolved_authors,
            processed = summary.processed_authors(),
            unique_domains = summary.unique_domains,
            "Finished resolving authors"
        );

        tracing::info!("Correcting domain affiliations");
        summary.corrected_domains = resolver.apply_corrections();

        fs::create_dir_all(&self.config.output.directory)?;
        let path = Path::new(&self.config.output.directory)
            .join(&self.config.output.locations_file);
        summary.records_written = write_locations(resolver.cache(), &path)?;

        Ok(summary.with_duration(start.elapsed()))
    }
}
