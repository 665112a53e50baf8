//! Core business logic for Scholar Map.
//!
//! # Modules
//!
//! - [`normalize`] - Email-domain and country-name normalization
//! - [`affiliation`] - Free-text affiliation parsing heuristics
//! - [`resolve`] - Resolution cache, cascading resolver, correction pass
//! - [`pipeline`] - Run orchestration, report writing, and run summary
//!
//! # Resolution Workflow
//!
//! One run processes every citing author strictly sequentially:
//!
//! 1. **Load**: Read the authors file and all reference registries
//! 2. **Resolve**: For each author, walk the source cascade
//!    (cache → national registry → network geolocation → global registry →
//!    free-text geocode), stopping at the first acceptable result
//! 3. **Correct**: Reconcile domains observed with multiple affiliations
//! 4. **Report**: Write the sorted locations CSV and log the run summary

pub mod affiliation;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
