//! Network geolocation lookup
//!
//! Resolves an email domain to an IPv4 address, then to a coarse location
//! through a local IP-geolocation store, with an organization-name fallback
//! from an IP-block table. IP geolocation is frequently wrong for shared
//! hosting and CDN-fronted domains, so a result whose country conflicts
//! with the independently-inferred country is discarded rather than
//! trusted.

use crate::core::normalize::CountryEquivalence;
use crate::domain::{InstitutionRecord, Lookup, Result, ScholarMapError};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

/// One range of the IP-geolocation store.
#[derive(Debug, Clone)]
pub struct GeoIpRange {
    pub ip_from: u32,
    pub ip_to: u32,
    /// Lowercased long country name
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zip: String,
    /// ISP name, present only in store editions that carry it
    pub isp: Option<String>,
}

/// Local IP-geolocation store, loaded from a headerless CSV of integer
/// ranges: `ip_from, ip_to, country_code, country_name, region, city,
/// latitude, longitude, zipcode[, isp]`.
#[derive(Debug, Clone)]
pub struct GeoIpStore {
    ranges: Vec<GeoIpRange>,
}

impl GeoIpStore {
    /// Loads the store and sorts it by range start for binary search.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarMapError::Registry`] if the file is missing or a
    /// row cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ScholarMapError::Registry(format!(
                "IP-geolocation store not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;

        let mut ranges = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;
            let parse_err = || {
                ScholarMapError::Registry(format!(
                    "{}: malformed range on line {}",
                    path.display(),
                    line + 1
                ))
            };
            let ip_from: u32 = record
                .get(0)
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(parse_err)?;
            let ip_to: u32 = record
                .get(1)
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(parse_err)?;
            let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
            ranges.push(GeoIpRange {
                ip_from,
                ip_to,
                country: field(3).to_lowercase(),
                region: field(4),
                city: field(5),
                latitude: field(6).parse().ok(),
                longitude: field(7).parse().ok(),
                zip: field(8),
                isp: record
                    .get(9)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty() && v != "-"),
            });
        }
        ranges.sort_by_key(|r| r.ip_from);

        tracing::info!(
            count = ranges.len(),
            path = %path.display(),
            "Loaded IP-geolocation store"
        );
        Ok(Self { ranges })
    }

    /// Builds a store directly from ranges. Test seam.
    #[cfg(test)]
    pub fn from_ranges(mut ranges: Vec<GeoIpRange>) -> Self {
        ranges.sort_by_key(|r| r.ip_from);
        Self { ranges }
    }

    /// Binary-searches the containing range for an address.
    pub fn lookup(&self, ip: Ipv4Addr) -> Option<&GeoIpRange> {
        let needle = u32::from(ip);
        let idx = self.ranges.partition_point(|r| r.ip_from <= needle);
        let range = self.ranges.get(idx.checked_sub(1)?)?;
        (needle <= range.ip_to).then_some(range)
    }
}

/// Parses a CIDR block (`a.b.c.d/prefix`) into `(network, mask)`.
fn parse_cidr(block: &str) -> Option<(u32, u32)> {
    let (addr, prefix) = block.trim().split_once('/')?;
    let addr: Ipv4Addr = addr.parse().ok()?;
    let prefix: u8 = prefix.parse().ok()?;
    if prefix > 32 {
        return None;
    }
    let mask = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    };
    Some((u32::from(addr) & mask, mask))
}

/// IP-block → organization-name table, loaded from a headerless CSV whose
/// third column is a CIDR block and fifth an organization name.
#[derive(Debug, Clone)]
pub struct OrgBlocks {
    blocks: Vec<(u32, u32, String)>,
}

impl OrgBlocks {
    /// Loads the table, skipping rows without a parseable block or with a
    /// placeholder organization name.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarMapError::Registry`] if the file is missing or
    /// unreadable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ScholarMapError::Registry(format!(
                "IP-block organization table not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;

        let mut blocks = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| ScholarMapError::Registry(format!("{}: {e}", path.display())))?;
            let Some((network, mask)) = record.get(2).and_then(parse_cidr) else {
                continue;
            };
            let name = record.get(4).unwrap_or("").trim();
            if name.is_empty() || name == "-" {
                continue;
            }
            blocks.push((network, mask, name.to_string()));
        }

        tracing::info!(
            count = blocks.len(),
            path = %path.display(),
            "Loaded IP-block organization table"
        );
        Ok(Self { blocks })
    }

    /// Builds a table directly from CIDR strings. Test seam.
    #[cfg(test)]
    pub fn from_blocks(entries: Vec<(&str, &str)>) -> Self {
        Self {
            blocks: entries
                .into_iter()
                .filter_map(|(cidr, name)| {
                    parse_cidr(cidr).map(|(network, mask)| (network, mask, name.to_string()))
                })
                .collect(),
        }
    }

    /// Returns the organization of the first block containing the address.
    pub fn organization(&self, ip: Ipv4Addr) -> Option<&str> {
        let needle = u32::from(ip);
        self.blocks
            .iter()
            .find(|(network, mask, _)| needle & mask == *network)
            .map(|(_, _, name)| name.as_str())
    }
}

/// Network geolocation source for the resolution cascade.
pub struct NetworkLocator {
    store: GeoIpStore,
    orgs: OrgBlocks,
}

impl NetworkLocator {
    /// Creates the locator from its two reference tables.
    pub fn new(store: GeoIpStore, orgs: OrgBlocks) -> Self {
        Self { store, orgs }
    }

    /// Resolves a domain through DNS and geolocates the address.
    ///
    /// DNS failures are expected (dead domains, offline runs) and yield
    /// [`Lookup::NotFound`] so the cascade continues.
    pub async fn locate(
        &self,
        domain: &str,
        affiliation: Option<&str>,
        known_country: Option<&str>,
        countries: &CountryEquivalence,
    ) -> Lookup {
        let ip = match resolve_ipv4(domain).await {
            Ok(Some(ip)) => ip,
            Ok(None) => {
                tracing::debug!(domain, "DNS resolution returned no IPv4 address");
                return Lookup::NotFound;
            }
            Err(e) => {
                tracing::debug!(domain, error = %e, "DNS resolution failed");
                return Lookup::NotFound;
            }
        };
        self.locate_ip(domain, ip, affiliation, known_country, countries)
    }

    /// Geolocates an already-resolved address. Split from [`locate`] so the
    /// cross-validation rules are testable without DNS.
    pub fn locate_ip(
        &self,
        domain: &str,
        ip: Ipv4Addr,
        affiliation: Option<&str>,
        known_country: Option<&str>,
        countries: &CountryEquivalence,
    ) -> Lookup {
        let Some(range) = self.store.lookup(ip) else {
            tracing::debug!(domain, ip = %ip, "Address not covered by geolocation store");
            return Lookup::NotFound;
        };

        // Country conflict is a strong distrust signal: shared hosting and
        // CDN fronting routinely place a domain in the wrong country.
        if let Some(known) = known_country {
            if !countries.equivalent(&range.country, known) {
                tracing::info!(
                    domain,
                    ip = %ip,
                    geo_country = %range.country,
                    known_country = %known,
                    "Discarding geolocation result with inconsistent country"
                );
                return Lookup::Inconsistent;
            }
        }

        let name = affiliation
            .map(str::to_string)
            .or_else(|| range.isp.clone())
            .or_else(|| self.orgs.organization(ip).map(str::to_string));

        let country = known_country
            .map(str::to_string)
            .unwrap_or_else(|| countries.canonical(&range.country));

        let record = InstitutionRecord {
            domain: domain.to_string(),
            name,
            country: Some(country),
            latitude: range.latitude,
            longitude: range.longitude,
            address: None,
            city: Some(range.city.clone()).filter(|s| !s.is_empty()),
            state: Some(range.region.clone()).filter(|s| !s.is_empty()),
            zip: Some(range.zip.clone()).filter(|s| !s.is_empty()),
        };
        tracing::info!(domain, ip = %ip, "Resolved institution via network geolocation");
        Lookup::Found(record)
    }
}

/// Resolves a domain to its first IPv4 address via the system resolver.
async fn resolve_ipv4(domain: &str) -> std::io::Result<Option<Ipv4Addr>> {
    let addrs = tokio::net::lookup_host((domain, 0)).await?;
    Ok(addrs.into_iter().find_map(|addr| match addr.ip() {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    }))
}
