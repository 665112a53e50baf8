//! Lookup outcome type for cascade sources
//!
//! Every source consulted by the resolver answers with a [`Lookup`] rather
//! than an error: having no answer for a domain is an expected outcome, not
//! a failure, and it must advance the cascade to the next source. Only
//! startup problems (missing reference files, unparseable registries) use
//! [`crate::domain::ScholarMapError`].

use super::models::InstitutionRecord;

/// Outcome of consulting one source in the resolution cascade.
///
/// All non-`Found` variants are treated identically by the resolver (the
/// cascade moves on to the next source), but they are logged differently
/// and carry different trust semantics:
///
/// - `NotFound`: the source was queried and has no answer.
/// - `Inconsistent`: the source answered, but the answer conflicts with an
///   already-trusted fact (typically the independently-inferred country).
///   The answer is discarded rather than trusted.
/// - `Transient`: a network-level failure (DNS, TLS, timeout) confined to
///   this source for this query.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The source produced an institution record
    Found(InstitutionRecord),

    /// The source has no answer for this domain
    NotFound,

    /// The source answered but failed cross-validation
    Inconsistent,

    /// The source failed with a transient network error
    Transient(String),
}

impl Lookup {
    /// Whether this outcome terminates the cascade.
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Consumes the outcome, returning the record if one was found.
    pub fn into_record(self) -> Option<InstitutionRecord> {
        match self {
            Lookup::Found(record) => Some(record),
            _ => None,
        }
    }
}
