//! Institution resolution
//!
//! This module implements the resolution engine: the per-run cache, the
//! cascading resolver over the reference sources, and the deferred
//! majority-correction pass.

pub mod cache;
pub mod correction;
pub mod resolver;

pub use cache::{DomainCacheEntry, ResolutionCache};
pub use correction::apply_corrections;
pub use resolver::Resolver;
