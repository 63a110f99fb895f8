//! Store seam: candidate identifiers, order keys and the `Store` trait the
//! engine drives.
//!
//! The trait keeps the pipeline testable against alternative stores; the
//! shipped implementation is [`sqlite::SqliteStore`].

pub mod models;
pub mod schema;
pub mod sqlite;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::query::{Field, ParsedQuery};
use models::UnifiedRecord;

/// One register record, tagged by family. Domestic records are keyed by
/// application number, international ones by international registration
/// number; the two namespaces may collide numerically, so the tag is part of
/// the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    Domestic(String),
    International(String),
}

impl RecordId {
    pub fn number(&self) -> &str {
        match self {
            RecordId::Domestic(number) | RecordId::International(number) => number,
        }
    }

    pub fn is_international(&self) -> bool {
        matches!(self, RecordId::International(_))
    }
}

/// Ephemeral per-query working set of record identifiers. Created and
/// discarded within one request; never persisted.
pub type CandidateSet = HashSet<RecordId>;

/// Sort key fetched in bulk for every candidate before paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub id: RecordId,
    pub reg_date: Option<NaiveDate>,
    pub filing_date: Option<NaiveDate>,
}

/// Read-only access to the register store.
///
/// Implementations perform no writes and hold no cross-request state; every
/// method is a bounded number of round trips.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// Resolves one parsed condition to the set of matching identifiers.
    /// A wildcard query resolves to the field's full corpus.
    async fn resolve(&self, field: Field, query: &ParsedQuery) -> Result<CandidateSet>;

    /// Every identifier of the families that carry `field`.
    async fn full_corpus(&self, field: Field) -> Result<CandidateSet>;

    /// Bulk-fetches the sort keys for a candidate set. Identifiers without a
    /// header row are logged and omitted.
    async fn order_keys(&self, candidates: &CandidateSet) -> Result<Vec<OrderKey>>;

    /// Assembles full records for an ordered page slice, preserving the
    /// requested order. Identifiers whose header has vanished are logged and
    /// skipped, never failing the page.
    async fn assemble(&self, page: &[RecordId]) -> Result<Vec<UnifiedRecord>>;

    /// Cheap liveness probe for health endpoints.
    async fn health_check(&self) -> Result<()>;
}
