//! Free-text affiliation parsing
//!
//! Authors enter affiliations as free text ("Prof. of CS at Stanford
//! University", "INRIA / Université Paris-Saclay"). This module derives a
//! usable institution name from that text with a small set of enumerated
//! heuristics. The rules are inherently approximate and are locked down by
//! example-based tests rather than generalized.

use crate::domain::models::UNKNOWN_AFFILIATION;
use regex::Regex;
use std::collections::HashSet;

/// Separators that typically delimit department/role prefixes from the
/// top-level organization. The trailing segment is kept.
const SEPARATOR_PATTERN: &str = r" / | - |,| at ";

/// Index of every institution name known to the structured registries.
///
/// Used for the direct substring shortcut when deriving an affiliation and
/// by the correction pass when reconciling observed affiliation strings.
/// All names are stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct KnownInstitutions {
    names: Vec<String>,
}

impl KnownInstitutions {
    /// Builds the index from lowercase institution names.
    ///
    /// Empty names are dropped; duplicates are kept only once.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for name in names {
            let name = name.trim().to_lowercase();
            if !name.is_empty() && seen.insert(name.clone()) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// Number of indexed institution names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the first known institution name occurring as a substring of
    /// the given text (case-insensitive).
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.names
            .iter()
            .find(|name| lower.contains(name.as_str()))
            .map(String::as_str)
    }

    /// Returns the first known institution name occurring as a substring of
    /// any of the given observation strings.
    pub fn find_in_any<'a, I>(&self, observations: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lowered: Vec<String> = observations
            .into_iter()
            .map(|o| o.to_lowercase())
            .collect();
        self.names
            .iter()
            .find(|name| lowered.iter().any(|o| o.contains(name.as_str())))
            .map(String::as_str)
    }
}

/// Recognizer for bare place names.
///
/// Built from reference data at startup: city names from the national
/// registry and country names from the normalization tables. A derived
/// affiliation that is *just* a city or country name is not a usable
/// institution name.
#[derive(Debug, Clone, Default)]
pub struct PlaceNames {
    cities: HashSet<String>,
    countries: HashSet<String>,
}

impl PlaceNames {
    /// Builds the recognizer from lowercase city and country names.
    pub fn new(
        cities: impl IntoIterator<Item = String>,
        countries: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            cities: cities
                .into_iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
            countries: countries
                .into_iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Whether the text is exactly a known city or country name.
    pub fn is_bare_place(&self, text: &str) -> bool {
        let lower = text.trim().to_lowercase();
        self.cities.contains(&lower) || self.countries.contains(&lower)
    }
}

/// Derives an institution name from a raw affiliation string.
///
/// Rules, in order:
/// 1. The [`UNKNOWN_AFFILIATION`] sentinel (or a missing affiliation)
///    yields `None`.
/// 2. If a known registry institution name occurs as a substring of the
///    text, that name is adopted directly.
/// 3. Otherwise the text is split on ` / `, ` - `, `,` and ` at `, and the
///    trailing segment is kept (the last segment is most often the
///    top-level organization).
/// 4. If the trailing segment is itself a bare city or country name, the
///    full original text is kept instead; a place name alone is not a
///    usable institution name.
pub fn derive_affiliation(
    raw: Option<&str>,
    known: &KnownInstitutions,
    places: &PlaceNames,
) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == UNKNOWN_AFFILIATION {
        return None;
    }

    if let Some(name) = known.find_in(raw) {
        return Some(name.to_string());
    }

    let separators = Regex::new(SEPARATOR_PATTERN).unwrap();
    let trailing = separators
        .split(raw)
        .last()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(raw);

    if places.is_bare_place(trailing) {
        return Some(raw.to_string());
    }

    Some(trailing.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn empty_known() -> KnownInstitutions {
        KnownInstitutions::default()
    }

    fn places() -> PlaceNames {
        PlaceNames::new(
            ["Lisbon".to_string(), "Palo Alto".to_string()],
            ["portugal".to_string(), "united states".to_string()],
        )
    }

    #[test]
    fn test_unknown_affiliation_sentinel() {
        let derived = derive_affiliation(Some("Unknown affiliation"), &empty_known(), &places());
        assert_eq!(derived, None);
        assert_eq!(derive_affiliation(None, &empty_known(), &places()), None);
    }

    #[test]
    fn test_known_institution_substring_wins() {
        let known = KnownInstitutions::new(["Stanford University".to_string()]);
        let derived = derive_affiliation(
            Some("PhD candidate, Stanford University, CA"),
            &known,
            &places(),
        );
        assert_eq!(derived, Some("stanford university".to_string()));
    }

    #[test_case("Professor of CS at Carnegie Mellon", "Carnegie Mellon"; "at separator")]
    #[test_case("INRIA / Universite Paris-Saclay", "Universite Paris-Saclay"; "slash separator")]
    #[test_case("Researcher - DeepMind", "DeepMind"; "dash separator")]
    #[test_case("Dept. of Physics, University of Tokyo", "University of Tokyo"; "comma separator")]
    #[test_case("Allen Institute", "Allen Institute"; "no separator")]
    fn test_trailing_segment(raw: &str, expected: &str) {
        let derived = derive_affiliation(Some(raw), &empty_known(), &places());
        assert_eq!(derived, Some(expected.to_string()));
    }

    #[test]
    fn test_hyphenated_names_are_not_split() {
        // " - " requires surrounding spaces; hyphenated names stay intact
        let derived = derive_affiliation(Some("Paris-Saclay Institute"), &empty_known(), &places());
        assert_eq!(derived, Some("Paris-Saclay Institute".to_string()));
    }

    #[test]
    fn test_bare_place_falls_back_to_full_text() {
        let derived = derive_affiliation(
            Some("Instituto Superior Tecnico, Lisbon"),
            &empty_known(),
            &places(),
        );
        assert_eq!(
            derived,
            Some("Instituto Superior Tecnico, Lisbon".to_string())
        );
    }

    #[test]
    fn test_bare_country_falls_back_to_full_text() {
        let derived = derive_affiliation(
            Some("SRI International at Portugal"),
            &empty_known(),
            &places(),
        );
        assert_eq!(derived, Some("SRI International at Portugal".to_string()));
    }

    #[test]
    fn test_find_in_any_observations() {
        let known = KnownInstitutions::new(["massachusetts institute of technology".to_string()]);
        let observations = vec![
            "MIT CSAIL".to_string(),
            "Massachusetts Institute of Technology, Cambridge".to_string(),
        ];
        let hit = known.find_in_any(observations.iter().map(String::as_str));
        assert_eq!(hit, Some("massachusetts institute of technology"));
    }
}
