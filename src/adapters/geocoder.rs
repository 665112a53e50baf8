//! Free-text geocoding client
//!
//! Thin client for a Nominatim-style geocoding service, plus the degrade
//! strategy used by the cascade: query with whatever fields are known and
//! progressively drop the most specific one until something geocodes or
//! nothing is left. The service is trusted for coordinates and country
//! only, never for institution naming.

use crate::config::GeocoderConfig;
use crate::core::normalize::CountryEquivalence;
use crate::domain::{Result, ScholarMapError};
use serde::Deserialize;
use std::time::Duration;

/// A successful geocode: coordinates plus the service's formatted address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl GeoFix {
    /// Country implied by the formatted address (its trailing segment),
    /// lowercased.
    pub fn implied_country(&self) -> String {
        self.address
            .rsplit(", ")
            .next()
            .unwrap_or(&self.address)
            .trim()
            .to_lowercase()
    }
}

/// One result row from the geocoding service. Coordinates arrive as
/// strings on the wire.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

/// HTTP client for the geocoding service.
///
/// A request timeout is always set: a hung geocoding call would otherwise
/// stall the whole batch.
pub struct GeocoderClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocoderClient {
    /// Creates the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarMapError::Configuration`] if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                ScholarMapError::Configuration(format!("Failed to build geocoder client: {e}"))
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Geocodes a single free-text query, returning the best match if any.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarMapError::Geocoder`] on transport failures or an
    /// unparseable response; callers in the cascade treat this as a
    /// transient, per-source failure.
    pub async fn geocode(&self, query: &str) -> Result<Option<GeoFix>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ScholarMapError::Geocoder(format!("query {query:?}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScholarMapError::Geocoder(format!(
                "query {query:?}: service returned {status}"
            )));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| ScholarMapError::Geocoder(format!("query {query:?}: {e}")))?;

        let Some(place) = places.into_iter().next() else {
            tracing::debug!(query = %query, "Geocoder returned no result");
            return Ok(None);
        };

        let (Ok(latitude), Ok(longitude)) = (place.lat.parse(), place.lon.parse()) else {
            return Err(ScholarMapError::Geocoder(format!(
                "query {query:?}: non-numeric coordinates in response"
            )));
        };
        Ok(Some(GeoFix {
            latitude,
            longitude,
            address: place.display_name,
        }))
    }

    /// Geocodes `(affiliation, city, country)` with iterative degradation.
    ///
    /// The fields are queried joined by `", "`. On a miss the most specific
    /// non-null field is dropped (affiliation first, then city) and the
    /// query retried; the procedure terminates with `None` once every field
    /// is exhausted.
    ///
    /// A result is cross-validated before acceptance: the country implied
    /// by its formatted address must match an independent geocode of the
    /// `country` field alone (compared through the equivalence table). A
    /// mismatch means the more specific fields dragged the match to the
    /// wrong place, so the result is distrusted and the degrade continues.
    pub async fn locate(
        &self,
        affiliation: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        countries: &CountryEquivalence,
    ) -> Result<Option<GeoFix>> {
        let attempts = [
            (affiliation, city, country),
            (None, city, country),
            (None, None, country),
        ];

        // Geocoded lazily, once, when the first candidate needs checking.
        let mut reference_country: Option<Option<String>> = None;
        let mut last_query: Option<String> = None;

        for (affiliation, city, country) in attempts {
            let fields: Vec<&str> = [affiliation, city, country]
                .into_iter()
                .flatten()
                .filter(|f| !f.trim().is_empty())
                .collect();
            if fields.is_empty() {
                break;
            }
            let query = fields.join(", ");
            if last_query.as_deref() == Some(query.as_str()) {
                continue;
            }
            last_query = Some(query.clone());

            let Some(fix) = self.geocode(&query).await? else {
                continue;
            };

            if let Some(country) = country {
                if reference_country.is_none() {
                    reference_country = Some(
                        self.geocode(country)
                            .await?
                            .map(|country_fix| country_fix.implied_country()),
                    );
                }
                if let Some(Some(reference)) = &reference_country {
                    if !countries.equivalent(&fix.implied_country(), reference) {
                        tracing::debug!(
                            query = %query,
                            implied = %fix.implied_country(),
                            expected = %reference,
                            "Geocoded result contradicts country, degrading query"
                        );
                        continue;
                    }
                }
            }
            return Ok(Some(fix));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: &str) -> GeocoderClient {
        GeocoderClient::new(&GeocoderConfig {
            base_url: base_url.to_string(),
            user_agent: "scholarmap-tests".to_string(),
            request_timeout_seconds: 5,
        })
        .unwrap()
    }

    fn body(lat: &str, lon: &str, display_name: &str) -> String {
        format!(r#"[{{"lat":"{lat}","lon":"{lon}","display_name":"{display_name}"}}]"#)
    }

    #[test]
    fn test_implied_country() {
        let fix = GeoFix {
            latitude: 37.42,
            longitude: -122.16,
            address: "Stanford, Santa Clara County, California, United States".to_string(),
        };
        assert_eq!(fix.implied_country(), "united states");
    }

    #[tokio::test]
    async fn test_geocode_parses_result() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "Stanford University".into()))
            .with_header("content-type", "application/json")
            .with_body(body("37.42", "-122.16", "Stanford, California, United States"))
            .create_async()
            .await;

        let fix = client(&server.url())
            .geocode("Stanford University")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fix.latitude, 37.42);
        assert_eq!(fix.implied_country(), "united states");
    }

    #[tokio::test]
    async fn test_geocode_empty_result() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let fix = client(&server.url()).geocode("nowhere at all").await.unwrap();
        assert!(fix.is_none());
    }

    #[tokio::test]
    async fn test_geocode_service_error_is_geocoder_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = client(&server.url()).geocode("anything").await;
        assert!(matches!(result, Err(ScholarMapError::Geocoder(_))));
    }

    #[tokio::test]
    async fn test_locate_degrades_to_country() {
        let mut server = mockito::Server::new_async().await;
        // affiliation-level query misses
        let _miss = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "Obscure Lab, portugal".into(),
            ))
            .with_body("[]")
            .create_async()
            .await;
        // country-level query hits
        let _hit = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "portugal".into()))
            .with_body(body("39.55", "-7.83", "Portugal"))
            .expect_at_least(1)
            .create_async()
            .await;

        let countries = CountryEquivalence::default();
        let fix = client(&server.url())
            .locate(Some("Obscure Lab"), None, Some("portugal"), &countries)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fix.implied_country(), "portugal");
    }

    #[tokio::test]
    async fn test_locate_rejects_country_mismatch() {
        let mut server = mockito::Server::new_async().await;
        // the affiliation drags the match to the wrong country
        let _wrong = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "Victoria University, australia".into(),
            ))
            .with_body(body("48.42", "-123.36", "Victoria, British Columbia, Canada"))
            .create_async()
            .await;
        // the reference geocode of the country field alone
        let _reference = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "australia".into()))
            .with_body(body("-24.77", "134.75", "Australia"))
            .expect_at_least(1)
            .create_async()
            .await;

        let countries = CountryEquivalence::default();
        let fix = client(&server.url())
            .locate(Some("Victoria University"), None, Some("australia"), &countries)
            .await
            .unwrap()
            .unwrap();
        // the affiliation-level result was distrusted; the country-level
        // result (Australia itself) is accepted instead
        assert_eq!(fix.implied_country(), "australia");
    }

    #[tokio::test]
    async fn test_locate_with_no_fields() {
        let server = mockito::Server::new_async().await;
        let countries = CountryEquivalence::default();
        let fix = client(&server.url())
            .locate(None, None, None, &countries)
            .await
            .unwrap();
        assert!(fix.is_none());
    }
}
