//! Error taxonomy for the search pipeline.
//!
//! Two things fail a call: a request rejected before any store access, and a
//! store that cannot be reached. Everything else degrades: no match is an
//! empty result, and data-integrity mismatches are logged and skipped during
//! assembly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Empty condition list, unrecognized field or malformed wildcard.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The relational store failed; the whole call fails with no partial
    /// page.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
