//! The search pipeline: parse every condition, resolve each to a candidate
//! set, combine under one global operator, order, page, assemble.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::models::UnifiedRecord;
use crate::db::{CandidateSet, OrderKey, RecordId, Store};
use crate::error::{Result, SearchError};
use crate::query::{self, Condition, Operator};

/// Page size applied when the caller passes `limit: 0`.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Hard ceiling on one page, whatever the caller asks for.
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub conditions: Vec<Condition>,
    pub operator: Operator,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<UnifiedRecord>,
    pub total_count: u64,
}

#[derive(Clone)]
pub struct SearchEngine<S: Store> {
    store: S,
}

impl<S: Store> SearchEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one search request end to end. An empty result is `Ok` with
    /// `total_count: 0`; only malformed requests and store failures error.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.conditions.is_empty() {
            return Err(SearchError::InvalidQuery(
                "at least one condition is required".to_string(),
            ));
        }

        // Parse everything up front so a malformed later condition rejects
        // the request before any store access.
        let mut parsed = Vec::with_capacity(request.conditions.len());
        for condition in &request.conditions {
            let parsed_query = query::parse(&condition.raw_query, condition.field.profile())?;
            if parsed_query.is_empty() {
                return Err(SearchError::InvalidQuery(format!(
                    "condition on {} has no usable terms",
                    condition.field
                )));
            }
            parsed.push((condition.field, parsed_query));
        }

        let mut candidates: Option<CandidateSet> = None;
        for (field, parsed_query) in &parsed {
            let resolved = self.store.resolve(*field, parsed_query).await?;
            candidates = Some(match (candidates, request.operator) {
                (None, _) => resolved,
                (Some(acc), Operator::And) => acc.intersection(&resolved).cloned().collect(),
                (Some(mut acc), Operator::Or) => {
                    acc.extend(resolved);
                    acc
                }
            });
            if request.operator == Operator::And
                && candidates.as_ref().is_some_and(|set| set.is_empty())
            {
                break;
            }
        }

        let candidates = candidates.unwrap_or_default();
        if candidates.is_empty() {
            return Ok(SearchResponse {
                results: Vec::new(),
                total_count: 0,
            });
        }

        let mut keys = self.store.order_keys(&candidates).await?;
        sort_order_keys(&mut keys);
        let total_count = keys.len() as u64;

        let page: Vec<RecordId> = keys
            .into_iter()
            .skip(request.offset)
            .take(effective_limit(request.limit))
            .map(|key| key.id)
            .collect();
        let results = if page.is_empty() {
            Vec::new()
        } else {
            self.store.assemble(&page).await?
        };

        debug!(
            total = total_count,
            page = results.len(),
            "search request complete"
        );
        Ok(SearchResponse {
            results,
            total_count,
        })
    }
}

/// Domestic before international, registration date descending, then filing
/// date descending, then identifier ascending. Dates sort with absent values
/// last, so registered marks surface before pending ones.
fn sort_order_keys(keys: &mut [OrderKey]) {
    keys.sort_unstable_by(|a, b| {
        a.id.is_international()
            .cmp(&b.id.is_international())
            .then_with(|| cmp_date_desc(a.reg_date, b.reg_date))
            .then_with(|| cmp_date_desc(a.filing_date, b.filing_date))
            .then_with(|| a.id.number().cmp(b.id.number()))
    });
}

fn cmp_date_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        limit.min(MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Field;
    use pretty_assertions::assert_eq;

    fn key(id: RecordId, reg: Option<&str>, filing: Option<&str>) -> OrderKey {
        OrderKey {
            id,
            reg_date: reg.map(|date| date.parse().unwrap()),
            filing_date: filing.map(|date| date.parse().unwrap()),
        }
    }

    fn domestic(num: &str) -> RecordId {
        RecordId::Domestic(num.to_string())
    }

    #[test]
    fn orders_domestic_before_international() {
        let mut keys = vec![
            key(
                RecordId::International("1500000".to_string()),
                Some("2024-01-01"),
                Some("2023-01-01"),
            ),
            key(domestic("2020138119"), None, Some("2020-11-06")),
        ];
        sort_order_keys(&mut keys);
        assert!(!keys[0].id.is_international());
        assert!(keys[1].id.is_international());
    }

    #[test]
    fn orders_by_registration_then_filing_then_identifier() {
        let mut keys = vec![
            key(domestic("3"), None, Some("2019-01-01")),
            key(domestic("2"), Some("2020-01-01"), None),
            key(domestic("1"), Some("2021-05-01"), None),
            key(domestic("5"), None, None),
            key(domestic("4"), None, Some("2019-01-01")),
        ];
        sort_order_keys(&mut keys);
        let order: Vec<&str> = keys.iter().map(|k| k.id.number()).collect();
        assert_eq!(order, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn clamps_page_limits() {
        assert_eq!(effective_limit(0), DEFAULT_PAGE_SIZE);
        assert_eq!(effective_limit(25), 25);
        assert_eq!(effective_limit(10_000), MAX_PAGE_SIZE);
    }

    #[test]
    fn deserializes_request_json() {
        let request: SearchRequest = serde_json::from_str(
            r#"{"conditions": [{"field": "display_text", "raw_query": "ソニー"}], "operator": "and"}"#,
        )
        .unwrap();
        assert_eq!(request.conditions.len(), 1);
        assert_eq!(request.conditions[0].field, Field::DisplayText);
        assert_eq!(request.conditions[0].raw_query, "ソニー");
        assert_eq!(request.operator, Operator::And);
        assert_eq!(request.limit, 0);
        assert_eq!(request.offset, 0);
    }
}
