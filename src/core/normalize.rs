//! Domain and country normalization
//!
//! Leaf utilities used across the cascade: email-domain canonicalization,
//! country-name equivalence, country inference from the email TLD, and the
//! title-casing applied when the report is written.

use std::collections::HashMap;

/// Splits a raw email domain into `(full_domain, base_domain)`.
///
/// `full_domain` is the part after `@`, lowercased. `base_domain` is its
/// last two dot-separated labels, an approximation of the registrable
/// domain (`cs.stanford.edu` → `stanford.edu`).
pub fn normalize_domain(email_domain: &str) -> (String, String) {
    let full = email_domain.trim().to_lowercase().replace('@', "");
    let labels: Vec<&str> = full.split('.').collect();
    let base = if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        full.clone()
    };
    (full, base)
}

/// Country assigned to `.ai` and `.mil` domains, bypassing all other
/// country inference. These TLDs are overwhelmingly used by US-based
/// entities in scholarly data, and WHOIS/geocoding for them is unreliable.
pub fn fixed_country(base_domain: &str) -> Option<&'static str> {
    if base_domain.ends_with(".ai") || base_domain.ends_with(".mil") {
        Some("united states")
    } else {
        None
    }
}

/// Country names for well-known academic and country-code TLDs.
const TLD_COUNTRIES: &[(&str, &str)] = &[
    ("edu", "united states"),
    ("gov", "united states"),
    ("us", "united states"),
    ("uk", "united kingdom"),
    ("de", "germany"),
    ("fr", "france"),
    ("it", "italy"),
    ("es", "spain"),
    ("pt", "portugal"),
    ("nl", "netherlands"),
    ("be", "belgium"),
    ("ch", "switzerland"),
    ("at", "austria"),
    ("se", "sweden"),
    ("no", "norway"),
    ("dk", "denmark"),
    ("fi", "finland"),
    ("ie", "ireland"),
    ("gr", "greece"),
    ("pl", "poland"),
    ("cz", "czech republic"),
    ("ca", "canada"),
    ("mx", "mexico"),
    ("br", "brazil"),
    ("ar", "argentina"),
    ("cl", "chile"),
    ("au", "australia"),
    ("nz", "new zealand"),
    ("jp", "japan"),
    ("cn", "china"),
    ("hk", "hong kong"),
    ("tw", "taiwan"),
    ("kr", "south korea"),
    ("sg", "singapore"),
    ("in", "india"),
    ("il", "israel"),
    ("tr", "turkey"),
    ("ru", "russia"),
    ("za", "south africa"),
    ("sa", "saudi arabia"),
    ("ae", "united arab emirates"),
    ("ir", "iran"),
    ("eg", "egypt"),
];

/// Infers a country from the last label of the base domain.
///
/// Returns a normalized lowercase country name for well-known academic and
/// country-code TLDs. Generic TLDs (`com`, `org`, `net`, …) yield no
/// inference. The [`fixed_country`] rule takes precedence over this table.
pub fn country_from_tld(base_domain: &str) -> Option<&'static str> {
    let tld = base_domain.rsplit('.').next()?;
    TLD_COUNTRIES
        .iter()
        .find(|(known, _)| *known == tld)
        .map(|(_, country)| *country)
}

/// Iterates every country name the TLD table can produce. Used to seed the
/// place-name index.
pub fn tld_country_names() -> impl Iterator<Item = &'static str> {
    TLD_COUNTRIES.iter().map(|(_, country)| *country)
}

/// Canonicalization table for alternate country-name spellings.
///
/// Consulted whenever two sources' country strings must be compared for
/// equality. Registries, the IP-geolocation store, and the geocoding
/// service disagree on long-form names ("Korea, Republic of" vs
/// "south korea"); this table folds the variants seen in practice onto one
/// spelling.
#[derive(Debug, Clone)]
pub struct CountryEquivalence {
    map: HashMap<String, String>,
}

impl Default for CountryEquivalence {
    fn default() -> Self {
        let entries = [
            ("korea (republic of)", "south korea"),
            ("korea, republic of", "south korea"),
            (
                "united kingdom of great britain and northern ireland",
                "united kingdom",
            ),
            ("ireland", "united kingdom"),
            ("united states of america", "united states"),
        ];
        Self {
            map: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl CountryEquivalence {
    /// Returns the canonical lowercase spelling for a country name.
    ///
    /// Unknown names pass through unchanged (lowercased).
    pub fn canonical(&self, name: &str) -> String {
        let lower = name.trim().to_lowercase();
        match self.map.get(&lower) {
            Some(canonical) => canonical.clone(),
            None => lower,
        }
    }

    /// Whether two country names refer to the same country after
    /// canonicalization.
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    /// Iterates over every spelling the table knows about, canonical
    /// spellings included. Used to seed the place-name index.
    pub fn known_spellings(&self) -> impl Iterator<Item = &str> {
        self.map
            .iter()
            .flat_map(|(k, v)| [k.as_str(), v.as_str()])
    }
}

/// Title-cases a name for report output.
///
/// Each word gets an uppercase first letter with the remainder lowercased;
/// common connectives stay lowercase when not leading. Stored names and
/// countries are lowercase throughout the pipeline, so this runs only at
/// the report boundary.
pub fn title_case(text: &str) -> String {
    const SMALL_WORDS: [&str; 9] = ["of", "and", "the", "at", "for", "in", "on", "de", "du"];

    let mut out = String::with_capacity(text.len());
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let lower = word.to_lowercase();
        if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
            None => continue,
        }
    }
    out
}
