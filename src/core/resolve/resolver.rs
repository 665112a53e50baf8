//! Cascading institution resolver
//!
//! For each author the resolver walks a fixed-priority cascade of sources,
//! stopping at the first acceptable result:
//!
//! `CacheHit → StructuredRegistry → NetworkGeolocation → GlobalRegistry →
//! FreeTextGeocode → Unresolved`
//!
//! Every source answers with a [`Lookup`]; anything other than `Found`
//! advances the cascade. `Unresolved` is a recorded outcome, not an error;
//! processing continues with the next author. Successful results are
//! registered in the cache before being returned, so a domain is resolved
//! externally at most once per run.

use crate::adapters::geocoder::GeocoderClient;
use crate::adapters::global::GlobalRegistry;
use crate::adapters::ipgeo::NetworkLocator;
use crate::adapters::national::NationalRegistry;
use crate::core::affiliation::{derive_affiliation, KnownInstitutions, PlaceNames};
use crate::core::normalize::{country_from_tld, fixed_country, normalize_domain, CountryEquivalence};
use crate::core::resolve::cache::ResolutionCache;
use crate::core::resolve::correction;
use crate::domain::{AuthorRecord, InstitutionRecord, Lookup};

/// Resolver context: owns the cascade sources, the normalization tables,
/// and the per-run cache. Lifecycle is scoped to one run.
pub struct Resolver {
    national: NationalRegistry,
    global: GlobalRegistry,
    network: NetworkLocator,
    geocoder: GeocoderClient,
    countries: CountryEquivalence,
    known: KnownInstitutions,
    places: PlaceNames,
    cache: ResolutionCache,
}

impl Resolver {
    /// Creates a resolver over the loaded reference sources.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        national: NationalRegistry,
        global: GlobalRegistry,
        network: NetworkLocator,
        geocoder: GeocoderClient,
        countries: CountryEquivalence,
        known: KnownInstitutions,
        places: PlaceNames,
    ) -> Self {
        Self {
            national,
            global,
            network,
            geocoder,
            countries,
            known,
            places,
            cache: ResolutionCache::new(),
        }
    }

    /// Resolves one author to an institution record.
    ///
    /// Returns `None` when the author reaches the `Unresolved` terminal
    /// state. Each resolution chain completes before the next author
    /// begins; the cache is consulted and updated synchronously.
    pub async fn resolve(&mut self, author: &AuthorRecord) -> Option<InstitutionRecord> {
        let (full_domain, base_domain) =
            normalize_domain(author.email_domain.as_deref().unwrap_or(""));
        if full_domain.is_empty() {
            tracing::debug!(author = %author.name, "Author has no usable email domain");
            return None;
        }

        // Country inferred from the email domain alone. The `.ai`/`.mil`
        // assignment is unconditional and survives whatever any source
        // reports later.
        let fixed = fixed_country(&base_domain);
        let country = fixed
            .or_else(|| country_from_tld(&base_domain))
            .map(str::to_string);
        let affiliation =
            derive_affiliation(author.affiliation.as_deref(), &self.known, &self.places);

        if let Some(record) = self.cache.get(&full_domain, affiliation.as_deref()) {
            return Some(record.clone());
        }

        let outcome = match self.national.lookup_domain(&full_domain) {
            Some(record) => Lookup::Found(record),
            None => Lookup::NotFound,
        };
        if let Some(record) = advance(outcome, &full_domain, "national-registry") {
            return Some(self.commit(record, fixed, affiliation.as_deref(), "national-registry"));
        }

        let outcome = self
            .network
            .locate(
                &full_domain,
                affiliation.as_deref(),
                country.as_deref(),
                &self.countries,
            )
            .await;
        if let Some(record) = advance(outcome, &full_domain, "network-geolocation") {
            return Some(self.commit(record, fixed, affiliation.as_deref(), "network-geolocation"));
        }

        let outcome = self.global_lookup(&full_domain).await;
        if let Some(record) = advance(outcome, &full_domain, "global-registry") {
            return Some(self.commit(record, fixed, affiliation.as_deref(), "global-registry"));
        }

        let outcome = self
            .free_text_lookup(&full_domain, affiliation.as_deref(), country.as_deref())
            .await;
        if let Some(record) = advance(outcome, &full_domain, "free-text-geocode") {
            return Some(self.commit(record, fixed, affiliation.as_deref(), "free-text-geocode"));
        }

        tracing::info!(
            domain = %full_domain,
            author = %author.name,
            "Author affiliation unresolved"
        );
        None
    }

    /// Global-registry stage: a domain hit is cross-referenced into the
    /// national registry by name (its geodata is more precise); failing
    /// that, the institution name is geocoded, keeping name and country
    /// from the global registry.
    async fn global_lookup(&self, domain: &str) -> Lookup {
        let Some(row) = self.global.lookup_domain(domain) else {
            return Lookup::NotFound;
        };

        if let Some(national_row) = self.national.lookup_name(&row.name) {
            tracing::debug!(
                domain,
                name = %row.name,
                "Global-registry hit cross-referenced to national registry"
            );
            return Lookup::Found(self.national.to_record(national_row, domain));
        }

        let country = Some(row.country.to_lowercase()).filter(|c| !c.is_empty());
        let fix = match self
            .geocoder
            .locate(
                Some(&row.name),
                row.state_province.as_deref(),
                country.as_deref(),
                &self.countries,
            )
            .await
        {
            Ok(fix) => fix,
            Err(e) => {
                tracing::warn!(
                    domain,
                    error = %e,
                    "Geocoding global-registry hit failed, keeping registry fields"
                );
                None
            }
        };

        let mut record = InstitutionRecord {
            name: Some(row.name.clone()),
            country,
            state: row.state_province.clone(),
            ..InstitutionRecord::new(domain)
        };
        if let Some(fix) = fix {
            record.latitude = Some(fix.latitude);
            record.longitude = Some(fix.longitude);
            record.address = Some(fix.address);
        }
        Lookup::Found(record)
    }

    /// Final fallback: geocode whatever free text and inferred country are
    /// available. The geocoder is trusted for coordinates and country
    /// only; the record keeps the affiliation-derived name.
    async fn free_text_lookup(
        &self,
        domain: &str,
        affiliation: Option<&str>,
        country: Option<&str>,
    ) -> Lookup {
        if affiliation.is_none() && country.is_none() {
            return Lookup::NotFound;
        }

        let fix = match self
            .geocoder
            .locate(affiliation, None, country, &self.countries)
            .await
        {
            Ok(fix) => fix,
            Err(e) => return Lookup::Transient(e.to_string()),
        };

        let mut record = InstitutionRecord {
            name: affiliation.map(str::to_string),
            country: country.map(str::to_string),
            ..InstitutionRecord::new(domain)
        };
        if let Some(fix) = fix {
            record.latitude = Some(fix.latitude);
            record.longitude = Some(fix.longitude);
            record.address = Some(fix.address);
        }
        Lookup::Found(record)
    }

    /// Applies the country override, registers the record in the cache and
    /// returns it.
    fn commit(
        &mut self,
        mut record: InstitutionRecord,
        fixed: Option<&str>,
        affiliation: Option<&str>,
        source: &str,
    ) -> InstitutionRecord {
        if let Some(fixed) = fixed {
            record.country = Some(fixed.to_string());
        }
        tracing::info!(domain = %record.domain, source, "Resolved institution");
        self.cache.put(record.clone(), affiliation);
        record
    }

    /// Runs the majority correction pass over the accumulated cache.
    ///
    /// Returns the number of corrected records.
    pub fn apply_corrections(&mut self) -> usize {
        correction::apply_corrections(&mut self.cache, &self.known)
    }

    /// The per-run resolution cache.
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }
}

/// Unwraps a stage outcome, logging the non-terminal variants.
fn advance(outcome: Lookup, domain: &str, source: &str) -> Option<InstitutionRecord> {
    match outcome {
        Lookup::Found(record) => Some(record),
        Lookup::NotFound => None,
        Lookup::Inconsistent => {
            tracing::debug!(domain, source, "Source answer failed cross-validation");
            None
        }
        Lookup::Transient(reason) => {
            tracing::warn!(
                domain,
                source,
                reason = %reason,
                "Transient failure, continuing cascade"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geocoder::GeocoderClient;
    use crate::adapters::ipgeo::{GeoIpStore, OrgBlocks};
    use crate::adapters::national::{NationalRegistry, NationalRow};
    use crate::config::GeocoderConfig;
    use mockito::Matcher;

    fn national_row(name: &str, website: &str) -> NationalRow {
        NationalRow {
            name: name.to_string(),
            alias: String::new(),
            address: "450 Serra Mall".to_string(),
            city: "Stanford".to_string(),
            state: "CA".to_string(),
            zip: "94305".to_string(),
            country: "US".to_string(),
            latitude: Some(37.42),
            longitude: Some(-122.16),
            website: website.to_string(),
        }
    }

    fn resolver(geocoder_url: &str) -> Resolver {
        let national = NationalRegistry::from_rows(vec![national_row(
            "stanford university",
            "cs.stanford.edu",
        )]);
        let known = KnownInstitutions::new(national.names().map(str::to_string));
        Resolver::new(
            national,
            GlobalRegistry::from_rows(vec![]),
            NetworkLocator::new(GeoIpStore::from_ranges(vec![]), OrgBlocks::from_blocks(vec![])),
            GeocoderClient::new(&GeocoderConfig {
                base_url: geocoder_url.to_string(),
                user_agent: "scholarmap-tests".to_string(),
                request_timeout_seconds: 5,
            })
            .unwrap(),
            CountryEquivalence::default(),
            known,
            PlaceNames::default(),
        )
    }

    fn author(domain: &str, affiliation: &str) -> AuthorRecord {
        AuthorRecord {
            name: "Test Author".to_string(),
            email_domain: Some(domain.to_string()),
            affiliation: Some(affiliation.to_string()),
        }
    }

    #[tokio::test]
    async fn test_national_registry_resolution() {
        let server = mockito::Server::new_async().await;
        let mut resolver = resolver(&server.url());

        let record = resolver
            .resolve(&author("@cs.stanford.edu", "Unknown affiliation"))
            .await
            .unwrap();
        assert_eq!(record.name.as_deref(), Some("stanford university"));
        assert_eq!(record.country.as_deref(), Some("united states"));
        assert!(record.has_coordinates());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_external_sources() {
        let server = mockito::Server::new_async().await;
        let mut resolver = resolver(&server.url());

        let first = resolver
            .resolve(&author("@cs.stanford.edu", "Stanford AI Lab, Stanford University"))
            .await
            .unwrap();
        let second = resolver
            .resolve(&author("@cs.stanford.edu", "CS Dept, Stanford University"))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_author_without_domain_is_unresolved() {
        let server = mockito::Server::new_async().await;
        let mut resolver = resolver(&server.url());

        let record = resolver
            .resolve(&AuthorRecord {
                name: "No Domain".to_string(),
                email_domain: Some(String::new()),
                affiliation: Some("Somewhere".to_string()),
            })
            .await;
        assert!(record.is_none());
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_free_text_fallback_keeps_affiliation_name() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect_at_least(1)
            .create_async()
            .await;
        let mut resolver = resolver(&server.url());

        // `.invalid` never resolves through DNS, so the network stage is
        // guaranteed to miss and the cascade reaches the free-text stage
        let record = resolver
            .resolve(&author("@lab.example.invalid", "Dept of CS, Obscure Institute"))
            .await
            .unwrap();
        assert_eq!(record.name.as_deref(), Some("Obscure Institute"));
        assert_eq!(record.country, None);
        assert!(!record.has_coordinates());
    }

    #[tokio::test]
    async fn test_ai_domain_forces_united_states() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let mut resolver = resolver(&server.url());

        let record = resolver
            .resolve(&author("@some-startup.ai", "Some Startup"))
            .await
            .unwrap();
        assert_eq!(record.country.as_deref(), Some("united states"));
    }
}
