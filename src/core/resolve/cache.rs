//! Per-domain resolution cache
//!
//! The cache guarantees exactly-once external resolution per domain within
//! a run: once a domain is present, every later lookup returns the cached
//! record, and the only side effect is provenance accumulation: each hit
//! appends the author's observed affiliation string to the domain's
//! observation list, which the correction pass consumes after the main
//! loop.

use crate::domain::InstitutionRecord;
use std::collections::HashMap;

/// Cache entry for one domain: the resolved record plus every raw
/// affiliation string observed mapping to that domain, in arrival order.
#[derive(Debug, Clone)]
pub struct DomainCacheEntry {
    pub record: InstitutionRecord,
    pub observations: Vec<String>,
}

/// Process-scoped resolution cache, built fresh per run.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, DomainCacheEntry>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached record for a domain, if present.
    ///
    /// A hit also appends the observed affiliation (when one was derived)
    /// to the domain's observation list; provenance is recorded even
    /// though the stored record is returned unchanged.
    pub fn get(&mut self, domain: &str, affiliation: Option<&str>) -> Option<&InstitutionRecord> {
        let entry = self.entries.get_mut(domain)?;
        if let Some(affiliation) = affiliation {
            entry.observations.push(affiliation.to_string());
        }
        tracing::debug!(domain, "Domain fetched from cache");
        Some(&entry.record)
    }

    /// Inserts a freshly resolved record, starting its observation list
    /// with the given affiliation.
    pub fn put(&mut self, record: InstitutionRecord, affiliation: Option<&str>) {
        let entry = DomainCacheEntry {
            record: record.clone(),
            observations: affiliation.map(str::to_string).into_iter().collect(),
        };
        self.entries.insert(record.domain.clone(), entry);
    }

    /// Whether a domain has already been resolved this run.
    pub fn contains(&self, domain: &str) -> bool {
        self.entries.contains_key(domain)
    }

    /// Number of resolved domains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the cached records.
    pub fn records(&self) -> impl Iterator<Item = &InstitutionRecord> {
        self.entries.values().map(|entry| &entry.record)
    }

    /// Iterates the entries mutably; used by the correction pass.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut DomainCacheEntry> {
        self.entries.values_mut()
    }
}
