//! Majority correction pass
//!
//! Runs once, after every author has been processed. Domains that several
//! authors mapped to often carry conflicting free-text affiliations; this
//! pass reconciles each such domain onto a single canonical name. It needs
//! no external calls and mutates only the cached records' names.

use super::cache::ResolutionCache;
use crate::core::affiliation::KnownInstitutions;
use std::collections::HashMap;

/// Reconciles every cached domain with more than one observed affiliation.
///
/// For each such domain: if a known registry institution name occurs as a
/// substring of any observation, that name is adopted. Otherwise the
/// observations are put to a plurality vote; a unique winner is adopted,
/// and a tie retains whatever name the record already carries, so the
/// outcome does not depend on tabulation order.
///
/// Returns the number of records whose name changed. The pass is
/// idempotent: running it a second time changes nothing.
pub fn apply_corrections(cache: &mut ResolutionCache, known: &KnownInstitutions) -> usize {
    let mut corrected = 0;
    for entry in cache.entries_mut() {
        if entry.observations.len() < 2 {
            continue;
        }

        let adopted = match known.find_in_any(entry.observations.iter().map(String::as_str)) {
            Some(name) => Some(name.to_string()),
            None => plurality_winner(&entry.observations),
        };

        if let Some(name) = adopted {
            if entry.record.name.as_deref() != Some(name.as_str()) {
                tracing::debug!(
                    domain = %entry.record.domain,
                    from = entry.record.name.as_deref().unwrap_or(""),
                    to = %name,
                    "Corrected domain affiliation"
                );
                entry.record.name = Some(name);
                corrected += 1;
            }
        }
    }
    corrected
}

/// Returns the single most frequent observation, or `None` on a tie.
fn plurality_winner(observations: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for observation in observations {
        *counts.entry(observation.as_str()).or_default() += 1;
    }
    let max = counts.values().copied().max()?;
    let mut winners = counts
        .into_iter()
        .filter(|(_, count)| *count == max)
        .map(|(name, _)| name);
    let winner = winners.next()?;
    winners.next().is_none().then(|| winner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InstitutionRecord;

    fn seeded_cache(domain: &str, name: Option<&str>, observations: &[&str]) -> ResolutionCache {
        let mut cache = ResolutionCache::new();
        let record = InstitutionRecord {
            name: name.map(str::to_string),
            ..InstitutionRecord::new(domain)
        };
        let mut observations = observations.iter();
        cache.put(record, observations.next().copied());
        for observation in observations {
            cache.get(domain, Some(observation));
        }
        cache
    }

    #[test]
    fn test_known_institution_substring_wins() {
        let known = KnownInstitutions::new(["stanford university".to_string()]);
        let mut cache = seeded_cache(
            "stanford.edu",
            Some("some lab"),
            &["AI Lab, Stanford University", "SAIL"],
        );

        let corrected = apply_corrections(&mut cache, &known);
        assert_eq!(corrected, 1);
        let entry = cache.entries_mut().next().unwrap();
        assert_eq!(entry.record.name.as_deref(), Some("stanford university"));
    }

    #[test]
    fn test_plurality_vote() {
        let known = KnownInstitutions::default();
        let mut cache = seeded_cache(
            "example.edu",
            Some("Example Lab"),
            &["Example Institute", "Example Institute", "Example Lab"],
        );

        let corrected = apply_corrections(&mut cache, &known);
        assert_eq!(corrected, 1);
        let entry = cache.entries_mut().next().unwrap();
        assert_eq!(entry.record.name.as_deref(), Some("Example Institute"));
    }

    #[test]
    fn test_identical_observations_vote_trivially() {
        let known = KnownInstitutions::default();
        let mut cache = seeded_cache("mit.edu", Some("MIT CSAIL"), &["MIT CSAIL", "MIT CSAIL"]);

        // the winner equals the stored name, so nothing changes
        assert_eq!(apply_corrections(&mut cache, &known), 0);
        let entry = cache.entries_mut().next().unwrap();
        assert_eq!(entry.record.name.as_deref(), Some("MIT CSAIL"));
    }

    #[test]
    fn test_tie_retains_stored_name() {
        let known = KnownInstitutions::default();
        let mut cache = seeded_cache(
            "example.edu",
            Some("Example Lab"),
            &["Example Institute", "Example Lab"],
        );

        assert_eq!(apply_corrections(&mut cache, &known), 0);
        let entry = cache.entries_mut().next().unwrap();
        assert_eq!(entry.record.name.as_deref(), Some("Example Lab"));
    }

    #[test]
    fn test_single_observation_is_left_alone() {
        let known = KnownInstitutions::default();
        let mut cache = seeded_cache("example.edu", Some("Original"), &["Something Else"]);

        assert_eq!(apply_corrections(&mut cache, &known), 0);
        let entry = cache.entries_mut().next().unwrap();
        assert_eq!(entry.record.name.as_deref(), Some("Original"));
    }

    #[test]
    fn test_idempotence() {
        let known = KnownInstitutions::new(["stanford university".to_string()]);
        let mut cache = seeded_cache(
            "stanford.edu",
            Some("some lab"),
            &["Stanford University AI Lab", "SAIL", "Stanford University"],
        );

        let first = apply_corrections(&mut cache, &known);
        assert_eq!(first, 1);
        let second = apply_corrections(&mut cache, &known);
        assert_eq!(second, 0);
    }
}
