//! Domain models and types for Scholar Map.
//!
//! This module contains the core domain models shared by the resolution
//! cascade and the reporting pipeline:
//!
//! - **Input model** ([`AuthorRecord`]) - one citing author as read from the
//!   authors file.
//! - **Output model** ([`InstitutionRecord`]) - the canonical institution
//!   resolved for one email domain.
//! - **Lookup outcome** ([`Lookup`]) - the explicit result type returned by
//!   every source in the cascade, replacing exception-style control flow.
//! - **Error types** ([`ScholarMapError`]) and the [`Result`] alias, for
//!   fatal-path errors.

pub mod errors;
pub mod lookup;
pub mod models;
pub mod result;

pub use errors::ScholarMapError;
pub use lookup::Lookup;
pub use models::{AuthorRecord, InstitutionRecord};
pub use result::Result;
