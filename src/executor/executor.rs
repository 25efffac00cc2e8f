//! Query executor
//!
//! Execution flow (strict order):
//! 1. Plan the filter against the collection's catalog
//! 2. Submit the plan's clauses to the store, bounded by a timeout
//! 3. Apply residual predicates (fallback plans only)
//! 4. Apply residual limit
//! 5. Return ordered results

use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::IndexCatalog;
use crate::filter::FilterSpec;
use crate::observability::{Event, MetricsRegistry};
use crate::planner::{QueryPlan, QueryPlanner};
use crate::store::{Record, Store, StoreError};

use super::errors::{ExecutorError, ExecutorResult};
use super::filters::ClauseFilter;

/// Plans and executes queries against a store
pub struct QueryExecutor<'a, S: Store + ?Sized> {
    store: &'a S,
    metrics: &'a MetricsRegistry,
    timeout: Duration,
}

impl<'a, S: Store + ?Sized> QueryExecutor<'a, S> {
    pub fn new(store: &'a S, metrics: &'a MetricsRegistry, timeout: Duration) -> Self {
        Self {
            store,
            metrics,
            timeout,
        }
    }

    /// Plans `spec` against `catalog` and executes the plan.
    pub async fn run(&self, catalog: &IndexCatalog, spec: &FilterSpec) -> ExecutorResult<Vec<Record>> {
        let plan = QueryPlanner::new(catalog).plan(spec);
        self.metrics.record_plan(plan.used_fallback);

        if plan.used_fallback && !spec.is_unfiltered() {
            warn!(
                event = %Event::FallbackPlanUsed,
                collection = %plan.collection,
                plan = %plan.describe(),
                "no composite index serves this query"
            );
        } else {
            debug!(event = %Event::QueryPlanned, plan = %plan.describe());
        }

        self.execute(&plan).await
    }

    /// Executes an already resolved plan.
    ///
    /// Store failures and timeouts are returned with the plan attached; no
    /// retry is attempted.
    pub async fn execute(&self, plan: &QueryPlan) -> ExecutorResult<Vec<Record>> {
        let outcome = tokio::time::timeout(self.timeout, self.store.execute(plan)).await;

        let records = match outcome {
            Ok(Ok(records)) => records,
            Ok(Err(source)) => return Err(self.store_failure(plan, source)),
            Err(_) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                return Err(self.store_failure(plan, StoreError::Timeout(millis)));
            }
        };

        let records = apply_residual(plan, records);
        self.metrics.add_records_returned(records.len() as u64);
        debug!(
            event = %Event::QueryExecuted,
            collection = %plan.collection,
            returned = records.len()
        );

        Ok(records)
    }

    fn store_failure(&self, plan: &QueryPlan, source: StoreError) -> ExecutorError {
        self.metrics.increment_store_failures();
        warn!(
            event = %Event::StoreExecutionFailed,
            collection = %plan.collection,
            plan = %plan.describe(),
            code = source.code(),
            transient = source.is_transient(),
            "store execution failed: {}",
            source
        );

        ExecutorError::Store {
            collection: plan.collection.clone(),
            plan: plan.describe(),
            source,
        }
    }
}

/// Residual predicates filter, then the residual limit truncates.
fn apply_residual(plan: &QueryPlan, mut records: Vec<Record>) -> Vec<Record> {
    if !plan.residual.is_empty() {
        records.retain(|r| ClauseFilter::matches_predicates(&r.body, &plan.residual));
    }
    if let Some(limit) = plan.residual_limit {
        records.truncate(limit);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IndexDescriptor;
    use crate::filter::SortDirection;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn catalog() -> IndexCatalog {
        IndexCatalog::new(
            "orcamentos",
            vec![IndexDescriptor::new(["status"], "dataCriacao", SortDirection::Desc)],
        )
    }

    fn store() -> MemoryStore {
        let records = (1..=6).map(|i| {
            Record::new(
                format!("orc-{}", i),
                json!({
                    "status": if i % 2 == 0 { "Aprovado" } else { "Pendente" },
                    "valor": i * 100,
                    "dataCriacao": format!("2024-01-0{}T00:00:00.000Z", i),
                }),
            )
        });
        MemoryStore::new().with_records("orcamentos", records)
    }

    #[tokio::test]
    async fn test_index_plan_execution() {
        let store = store();
        let metrics = MetricsRegistry::new();
        let executor = QueryExecutor::new(&store, &metrics, Duration::from_secs(1));
        let spec = FilterSpec::builder()
            .eq("status", "Aprovado")
            .order_by("dataCriacao", SortDirection::Desc)
            .limit(2)
            .build()
            .unwrap();

        let records = executor.run(&catalog(), &spec).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["orc-6", "orc-4"]);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.queries_planned, 1);
        assert_eq!(snapshot.fallback_plans, 0);
        assert_eq!(snapshot.records_returned, 2);
    }

    #[tokio::test]
    async fn test_fallback_applies_residual_before_limit() {
        let store = store();
        let metrics = MetricsRegistry::new();
        let executor = QueryExecutor::new(&store, &metrics, Duration::from_secs(1));
        let spec = FilterSpec::builder()
            .eq("status", "Aprovado")
            .range("valor", Some(json!(300)), None)
            .order_by("dataCriacao", SortDirection::Desc)
            .limit(1)
            .build()
            .unwrap();

        let records = executor.run(&catalog(), &spec).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "orc-6");
        assert_eq!(metrics.snapshot().fallback_plans, 1);
    }

    #[tokio::test]
    async fn test_store_failure_carries_plan() {
        let store = store().failing(StoreError::Unavailable("offline".into()));
        let metrics = MetricsRegistry::new();
        let executor = QueryExecutor::new(&store, &metrics, Duration::from_secs(1));

        let err = executor.run(&catalog(), &FilterSpec::all()).await.unwrap_err();
        match &err {
            ExecutorError::Store {
                collection, plan, ..
            } => {
                assert_eq!(collection, "orcamentos");
                assert_eq!(plan, "orcamentos full scan");
            }
        }
        assert_eq!(err.store_error(), &StoreError::Unavailable("offline".into()));
        assert_eq!(metrics.snapshot().store_failures, 1);
        assert_eq!(store.executions(), 1);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_store_error() {
        let store = store().with_latency(Duration::from_secs(5));
        let metrics = MetricsRegistry::new();
        let executor = QueryExecutor::new(&store, &metrics, Duration::from_millis(200));

        let err = executor.run(&catalog(), &FilterSpec::all()).await.unwrap_err();
        assert_eq!(err.store_error(), &StoreError::Timeout(200));
        assert!(err.is_transient());
    }
}
