pub mod canon;
pub mod db;
pub mod engine;
pub mod error;
pub mod query;

pub use canon::{Profile, canonicalize, mark_keys, split_two_row};
pub use db::models::{ClassificationEntry, UnifiedRecord};
pub use db::sqlite::SqliteStore;
pub use db::{CandidateSet, OrderKey, RecordId, Store};
pub use engine::{SearchEngine, SearchRequest, SearchResponse};
pub use error::{Result, SearchError};
pub use query::{Condition, Field, Operator, ParsedQuery};
