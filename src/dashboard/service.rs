//! Dashboard service
//!
//! Entry point used by the dashboard screens. Every call plans a fresh
//! query and executes it against the injected store; nothing is cached.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{
    group_by_field, summarize, summarize_grouped, Cents, ClassificationTable, GroupedSummary,
    SummaryRecord,
};
use crate::catalog::{CatalogResult, IndexCatalog};
use crate::config::DashboardConfig;
use crate::executor::QueryExecutor;
use crate::filter::{timestamp_value, FilterSpec, Predicate, SortSpec};
use crate::observability::{Event, MetricsRegistry};
use crate::planner::{QueryPlan, QueryPlanner};
use crate::store::{Record, Store};

use super::catalogs::builtin_catalog;
use super::errors::DashboardResult;
use super::filters::RecordFilter;
use super::rules::{classification_table, invoice_buckets};
use super::schema::{invoice, quote, RecordKind};

/// Figures shown on the dashboard landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub as_of: DateTime<Utc>,
    pub quotes: SummaryRecord,
    pub invoices: SummaryRecord,
    /// Pending invoices due at or before `as_of`
    pub overdue_count: usize,
    pub overdue_amount: Cents,
    pub margin: Cents,
}

/// Received payments minus `cost_ratio` of the gross (non-voided) quote value
pub fn margin(quotes: &SummaryRecord, invoices: &SummaryRecord, cost_ratio: f64) -> Cents {
    let paid = invoices.amount(invoice_buckets::PAID);
    paid - quotes.total_amount.scale(cost_ratio)
}

pub struct DashboardService<S: Store> {
    store: S,
    config: DashboardConfig,
    metrics: MetricsRegistry,
    quote_catalog: Option<IndexCatalog>,
    invoice_catalog: Option<IndexCatalog>,
    quote_rules: ClassificationTable,
    invoice_rules: ClassificationTable,
}

impl<S: Store> DashboardService<S> {
    pub fn new(store: S, config: DashboardConfig) -> Self {
        let precision = config.rate_precision;
        Self {
            store,
            config,
            metrics: MetricsRegistry::new(),
            quote_catalog: None,
            invoice_catalog: None,
            quote_rules: classification_table(RecordKind::Quotes, precision),
            invoice_rules: classification_table(RecordKind::Invoices, precision),
        }
    }

    /// Replaces the built-in catalog of one kind
    pub fn with_catalog(mut self, kind: RecordKind, catalog: IndexCatalog) -> Self {
        match kind {
            RecordKind::Quotes => self.quote_catalog = Some(catalog),
            RecordKind::Invoices => self.invoice_catalog = Some(catalog),
        }
        self
    }

    /// Replaces both catalogs from one index-definition file
    pub fn with_catalog_file(self, path: &Path) -> CatalogResult<Self> {
        let quotes = IndexCatalog::from_file(quote::COLLECTION, path)?;
        let invoices = IndexCatalog::from_file(invoice::COLLECTION, path)?;
        info!(
            event = %Event::CatalogLoaded,
            path = %path.display(),
            quote_indexes = quotes.len(),
            invoice_indexes = invoices.len()
        );

        Ok(self
            .with_catalog(RecordKind::Quotes, quotes)
            .with_catalog(RecordKind::Invoices, invoices))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn catalog(&self, kind: RecordKind) -> &IndexCatalog {
        let custom = match kind {
            RecordKind::Quotes => self.quote_catalog.as_ref(),
            RecordKind::Invoices => self.invoice_catalog.as_ref(),
        };
        custom.unwrap_or_else(|| builtin_catalog(kind))
    }

    pub fn rules(&self, kind: RecordKind) -> &ClassificationTable {
        match kind {
            RecordKind::Quotes => &self.quote_rules,
            RecordKind::Invoices => &self.invoice_rules,
        }
    }

    /// Resolves a filter form without executing it
    pub fn plan(&self, filter: &impl RecordFilter) -> DashboardResult<QueryPlan> {
        let spec = filter.to_spec(self.config.default_limit)?;
        Ok(QueryPlanner::new(self.catalog(filter.kind())).plan(&spec))
    }

    /// Executes a filter form
    pub async fn list(&self, filter: &impl RecordFilter) -> DashboardResult<Vec<Record>> {
        let spec = filter.to_spec(self.config.default_limit)?;
        self.query(filter.kind(), &spec).await
    }

    /// Executes an already built spec
    pub async fn query(&self, kind: RecordKind, spec: &FilterSpec) -> DashboardResult<Vec<Record>> {
        let executor = QueryExecutor::new(&self.store, &self.metrics, self.config.store_timeout());
        Ok(executor.run(self.catalog(kind), spec).await?)
    }

    pub async fn summary(&self, kind: RecordKind) -> DashboardResult<SummaryRecord> {
        let records = self.scan(kind).await?;
        let summary = summarize(self.rules(kind), &records);
        self.metrics.record_summary(summary.total, summary.unknown);
        Ok(summary)
    }

    pub async fn grouped(&self, kind: RecordKind, field: &str) -> DashboardResult<GroupedSummary> {
        let records = self.scan(kind).await?;
        let grouped = summarize_grouped(self.rules(kind), &records, group_by_field(field));
        for (_, summary) in grouped.iter() {
            self.metrics.record_summary(summary.total, summary.unknown);
        }
        Ok(grouped)
    }

    pub async fn quotes_summary(&self) -> DashboardResult<SummaryRecord> {
        self.summary(RecordKind::Quotes).await
    }

    pub async fn invoices_summary(&self) -> DashboardResult<SummaryRecord> {
        self.summary(RecordKind::Invoices).await
    }

    pub async fn quotes_by_client(&self) -> DashboardResult<GroupedSummary> {
        self.grouped(RecordKind::Quotes, quote::CLIENT).await
    }

    pub async fn quotes_by_service(&self) -> DashboardResult<GroupedSummary> {
        self.grouped(RecordKind::Quotes, quote::SERVICE_TYPE).await
    }

    pub async fn invoices_by_client(&self) -> DashboardResult<GroupedSummary> {
        self.grouped(RecordKind::Invoices, invoice::CLIENT).await
    }

    /// Pending invoices due at or before `as_of`, earliest due first
    pub async fn overdue_invoices(&self, as_of: DateTime<Utc>) -> DashboardResult<Vec<Record>> {
        let spec = FilterSpec::builder()
            .eq(invoice::STATUS, invoice::PENDING)
            .filter(Predicate::lte(invoice::DUE_AT, timestamp_value(as_of)))
            .sort(SortSpec::asc(invoice::DUE_AT))
            .build()?;
        self.query(RecordKind::Invoices, &spec).await
    }

    /// Both summaries and the overdue listing, fetched concurrently
    pub async fn overview(&self, as_of: DateTime<Utc>) -> DashboardResult<Overview> {
        let (quotes, invoices, overdue) = tokio::try_join!(
            self.quotes_summary(),
            self.invoices_summary(),
            self.overdue_invoices(as_of)
        )?;

        let overdue_amount: Cents = overdue
            .iter()
            .filter_map(|r| r.amount(invoice::AMOUNT))
            .map(Cents::from_amount)
            .sum();
        let margin = margin(&quotes, &invoices, self.config.margin_cost_ratio);

        info!(
            event = %Event::OverviewComplete,
            quotes = quotes.total,
            invoices = invoices.total,
            overdue = overdue.len(),
            margin = %margin
        );

        Ok(Overview {
            as_of,
            quotes,
            invoices,
            overdue_count: overdue.len(),
            overdue_amount,
            margin,
        })
    }

    /// Received payments minus the configured cost share of quote value
    pub async fn margin(&self) -> DashboardResult<Cents> {
        let (quotes, invoices) = tokio::try_join!(self.quotes_summary(), self.invoices_summary())?;
        Ok(margin(&quotes, &invoices, self.config.margin_cost_ratio))
    }

    async fn scan(&self, kind: RecordKind) -> DashboardResult<Vec<Record>> {
        self.query(kind, &FilterSpec::all()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::QuoteFilter;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> DashboardService<MemoryStore> {
        let store = MemoryStore::new()
            .with_records(
                quote::COLLECTION,
                vec![
                    Record::new("q1", json!({"status": "Aprovado", "valor": 1000, "cliente": "ACME"})),
                    Record::new("q2", json!({"status": "Cancelado", "valor": 400, "cliente": "ACME"})),
                ],
            )
            .with_records(
                invoice::COLLECTION,
                vec![Record::new("n1", json!({"status": "Paga", "valor": 900}))],
            );
        DashboardService::new(store, DashboardConfig::default())
    }

    #[test]
    fn test_margin_formula() {
        let quotes = SummaryRecord {
            total_amount: Cents::new(100_000),
            ..Default::default()
        };
        let mut invoices = SummaryRecord::default();
        invoices.amounts.insert("paga".into(), Cents::new(90_000));

        assert_eq!(margin(&quotes, &invoices, 0.7), Cents::new(20_000));
        assert_eq!(margin(&quotes, &invoices, 0.0), Cents::new(90_000));
    }

    #[tokio::test]
    async fn test_margin_excludes_voided_quotes() {
        let service = service();
        assert_eq!(service.margin().await.unwrap(), Cents::new(20_000));
    }

    #[test]
    fn test_plan_uses_builtin_catalog() {
        let service = service();
        let plan = service.plan(&QuoteFilter::default().with_status("Aprovado")).unwrap();
        assert!(!plan.used_fallback);
        assert_eq!(plan.collection, "orcamentos");
    }

    #[test]
    fn test_custom_catalog_replaces_builtin() {
        let service = service().with_catalog(
            RecordKind::Quotes,
            IndexCatalog::new(quote::COLLECTION, Vec::new()),
        );
        let plan = service.plan(&QuoteFilter::default().with_status("Aprovado")).unwrap();
        assert!(plan.used_fallback);
    }
}
