//! External data sources for Scholar Map.
//!
//! This module provides the adapters for every reference source the
//! resolution cascade consults, plus the authors-file loader:
//!
//! - [`authors`] - Citing-author records from the upstream scraping step
//! - [`national`] - National institution registry (CSV, precise geodata)
//! - [`global`] - Global institution registry (JSON, domains/web pages)
//! - [`ipgeo`] - DNS resolution, IP-geolocation store, organization blocks
//! - [`geocoder`] - Free-text geocoding service client
//!
//! All registries are read-only reference data, loaded once at startup; a
//! missing file is fatal before any author is processed. The geocoder is
//! the only adapter that performs per-query network I/O besides DNS.

pub mod authors;
pub mod geocoder;
pub mod global;
pub mod ipgeo;
pub mod national;
