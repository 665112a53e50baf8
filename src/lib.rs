// Scholar Map - citing-author institution resolution
// Copyright (c) 2025 Scholar Map Contributors
// Licensed under the MIT License

//! # Scholar Map - citing-author institution resolution
//!
//! Scholar Map is a batch tool that enriches citing-author records with
//! institutional affiliation and geographic location, producing the
//! country/institution breakdown behind a scholarly impact map.
//!
//! ## Overview
//!
//! The core is a cascading institution resolver: given an author's email
//! domain and free-text affiliation, it determines a canonical institution
//! (name, country, coordinates) from several independent, imperfect data
//! sources that are cross-validated against each other:
//!
//! 1. **Resolution cache** - each domain is resolved externally at most
//!    once per run
//! 2. **National registry** - curated institutions with precise geodata,
//!    matched by website suffix
//! 3. **Network geolocation** - DNS resolution plus a local IP-geolocation
//!    store, rejected on country conflict
//! 4. **Global registry** - worldwide institution domains, cross-referenced
//!    back into the national registry
//! 5. **Free-text geocoding** - a degrading geocode of the parsed
//!    affiliation string
//!
//! After all authors are processed, a majority correction pass reconciles
//! domains observed with multiple affiliation strings, and the cache is
//! written out as the sorted locations report.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (normalization, resolution, pipeline)
//! - [`adapters`] - Reference data sources and the geocoder client
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scholarmap::config::load_config;
//! use scholarmap::core::pipeline::LocateCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("scholarmap.toml")?;
//!
//!     let coordinator = LocateCoordinator::new(config);
//!     let summary = coordinator.run().await?;
//!
//!     println!(
//!         "Resolved {}/{} authors",
//!         summary.resolved_authors,
//!         summary.processed_authors()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Having no answer for a domain is not an error: cascade sources report
//! through [`domain::Lookup`], and only fatal conditions (missing reference
//! files, unwritable reports) surface as [`domain::ScholarMapError`]:
//!
//! ```rust,no_run
//! use scholarmap::domain::{Result, ScholarMapError};
//!
//! fn example() -> Result<()> {
//!     let config = scholarmap::config::load_config("scholarmap.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Scholar Map uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(domain = "cs.stanford.edu", "Resolved institution");
//! warn!(domain = "example.org", "Transient failure, continuing cascade");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
