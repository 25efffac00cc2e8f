//! In-memory store
//!
//! Holds immutable collections and executes plans the way the document
//! store does, including rejecting clause combinations the store cannot
//! serve. Used by tests and the CLI.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;

use crate::executor::{ClauseFilter, ResultSorter};
use crate::planner::{Clause, QueryPlan};

use super::errors::{StoreError, StoreResult};
use super::record::Record;
use super::{Store, StoreFuture};

/// Collections held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Record>>,
    failure: Option<StoreError>,
    latency: Option<Duration>,
    executions: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records to a collection
    pub fn with_records(
        mut self,
        collection: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) -> Self {
        self.collections
            .entry(collection.into())
            .or_default()
            .extend(records);
        self
    }

    /// Every execution fails with `error`
    pub fn failing(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Every execution waits `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Loads collections from a JSON object of document arrays:
    /// `{"orcamentos": [{...}], "notasFiscais": [{...}]}`
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let parsed: HashMap<String, Vec<Value>> = serde_json::from_str(json)
            .map_err(|e| StoreError::Rejected(format!("invalid record file: {}", e)))?;

        let mut store = Self::new();
        for (collection, documents) in parsed {
            store = store.with_records(collection, documents.into_iter().map(Record::from_document));
        }
        Ok(store)
    }

    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    /// Number of `execute` calls received
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::Relaxed)
    }

    fn run(&self, plan: &QueryPlan) -> StoreResult<Vec<Record>> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        validate_clauses(&plan.clauses)?;

        let mut records: Vec<Record> = self
            .collections
            .get(&plan.collection)
            .into_iter()
            .flatten()
            .filter(|r| ClauseFilter::matches(&r.body, &plan.clauses))
            .cloned()
            .collect();

        let order_by = plan.clauses.iter().find_map(|c| match c {
            Clause::OrderBy { field, direction } => Some((field.as_str(), *direction)),
            _ => None,
        });
        match order_by {
            Some((field, direction)) => ResultSorter::sort(&mut records, field, direction),
            None => records.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        if let Some(n) = plan.clauses.iter().find_map(|c| match c {
            Clause::Limit { n } => Some(*n),
            _ => None,
        }) {
            records.truncate(n);
        }

        Ok(records)
    }
}

impl Store for MemoryStore {
    fn execute<'a>(&'a self, plan: &'a QueryPlan) -> StoreFuture<'a> {
        Box::pin(async move {
            self.executions.fetch_add(1, Ordering::Relaxed);
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            self.run(plan)
        })
    }
}

/// Rejects clause lists the document store refuses to serve.
fn validate_clauses(clauses: &[Clause]) -> StoreResult<()> {
    let range_fields: BTreeSet<&str> = clauses
        .iter()
        .filter(|c| c.is_range_type())
        .filter_map(Clause::field)
        .collect();
    if range_fields.len() > 1 {
        return Err(StoreError::Rejected(format!(
            "range filters on more than one field: {:?}",
            range_fields
        )));
    }

    let orders: Vec<&str> = clauses
        .iter()
        .filter(|c| matches!(c, Clause::OrderBy { .. }))
        .filter_map(Clause::field)
        .collect();
    if orders.len() > 1 {
        return Err(StoreError::Rejected("more than one orderBy".into()));
    }
    if clauses
        .iter()
        .filter(|c| matches!(c, Clause::Limit { .. }))
        .count()
        > 1
    {
        return Err(StoreError::Rejected("more than one limit".into()));
    }

    if let (Some(range), Some(order)) = (range_fields.iter().next(), orders.first()) {
        if range != order {
            return Err(StoreError::Rejected(format!(
                "range on '{}' requires orderBy on the same field, got '{}'",
                range, order
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortDirection;
    use crate::planner::RangeOp;
    use serde_json::json;

    fn plan(clauses: Vec<Clause>) -> QueryPlan {
        QueryPlan {
            collection: "orcamentos".into(),
            index: None,
            clauses,
            residual: Vec::new(),
            residual_limit: None,
            used_fallback: true,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_records(
            "orcamentos",
            vec![
                Record::new("b", json!({"status": "Aprovado", "valor": 200, "dataCriacao": "2024-02-01T00:00:00.000Z"})),
                Record::new("a", json!({"status": "Pendente", "valor": 100, "dataCriacao": "2024-01-01T00:00:00.000Z"})),
                Record::new("c", json!({"status": "Aprovado", "valor": 50, "dataCriacao": "2024-03-01T00:00:00.000Z"})),
            ],
        )
    }

    #[tokio::test]
    async fn test_filters_sorts_and_limits() {
        let store = store();
        let plan = plan(vec![
            Clause::Equals {
                field: "status".into(),
                value: json!("Aprovado"),
            },
            Clause::OrderBy {
                field: "dataCriacao".into(),
                direction: SortDirection::Desc,
            },
            Clause::Limit { n: 1 },
        ]);

        let records = store.execute(&plan).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "c");
        assert_eq!(store.executions(), 1);
    }

    #[tokio::test]
    async fn test_unordered_results_by_id() {
        let records = store().execute(&plan(Vec::new())).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_rejects_range_with_other_order() {
        let plan = plan(vec![
            Clause::Range {
                field: "valor".into(),
                op: RangeOp::Gte,
                value: json!(100),
            },
            Clause::OrderBy {
                field: "dataCriacao".into(),
                direction: SortDirection::Desc,
            },
        ]);

        let err = store().execute(&plan).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_rejects_two_range_fields() {
        let plan = plan(vec![
            Clause::Range {
                field: "valor".into(),
                op: RangeOp::Gte,
                value: json!(100),
            },
            Clause::PrefixRange {
                field: "clienteBusca".into(),
                lower: "a".into(),
                upper: "a\u{f8ff}".into(),
            },
        ]);

        assert!(store().execute(&plan).await.is_err());
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = store().failing(StoreError::Unavailable("offline".into()));
        let err = store.execute(&plan(Vec::new())).await.unwrap_err();
        assert_eq!(err, StoreError::Unavailable("offline".into()));
    }

    #[test]
    fn test_from_json() {
        let store = MemoryStore::from_json(
            r#"{"orcamentos": [{"id": "o1", "valor": 1}, {"valor": 2}], "notasFiscais": []}"#,
        )
        .unwrap();
        assert_eq!(store.len("orcamentos"), 2);
        assert_eq!(store.len("notasFiscais"), 0);
        assert_eq!(store.len("missing"), 0);
    }
}
