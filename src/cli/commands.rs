//! CLI command implementations
//!
//! Each command loads configuration, builds a [`DashboardService`] over an
//! in-memory store, runs one operation and prints the result.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::DashboardConfig;
use crate::dashboard::{
    DashboardService, InvoiceFilter, QuoteFilter, RecordFilter, RecordKind,
};
use crate::filter::{FilterResult, FilterSpec};
use crate::planner::ExplainPlan;
use crate::store::MemoryStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_filter, write_json, write_text};

/// Filter form of either kind, parsed from a CLI argument
#[derive(Debug, Clone, PartialEq)]
pub enum FormFilter {
    Quotes(QuoteFilter),
    Invoices(InvoiceFilter),
}

impl FormFilter {
    pub fn parse(kind: RecordKind, value: Value) -> CliResult<Self> {
        let invalid = |e: serde_json::Error| CliError::invalid_filter(format!("{} filter: {}", kind, e));
        Ok(match kind {
            RecordKind::Quotes => FormFilter::Quotes(serde_json::from_value(value).map_err(invalid)?),
            RecordKind::Invoices => {
                FormFilter::Invoices(serde_json::from_value(value).map_err(invalid)?)
            }
        })
    }
}

impl RecordFilter for FormFilter {
    fn kind(&self) -> RecordKind {
        match self {
            FormFilter::Quotes(f) => f.kind(),
            FormFilter::Invoices(f) => f.kind(),
        }
    }

    fn to_spec(&self, default_limit: usize) -> FilterResult<FilterSpec> {
        match self {
            FormFilter::Quotes(f) => f.to_spec(default_limit),
            FormFilter::Invoices(f) => f.to_spec(default_limit),
        }
    }
}

/// Run a CLI command
pub async fn run_command(config_path: Option<&Path>, command: Command) -> CliResult<()> {
    let config = match config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    match command {
        Command::Explain { kind, filter, json } => {
            let service = build_service(MemoryStore::new(), config)?;
            explain(&service, kind, filter.as_deref(), json)
        }
        Command::Query {
            records,
            kind,
            filter,
        } => {
            let service = build_service(MemoryStore::from_file(&records)?, config)?;
            query(&service, kind, filter.as_deref()).await
        }
        Command::Summary {
            records,
            kind,
            group_by,
        } => {
            let service = build_service(MemoryStore::from_file(&records)?, config)?;
            summary(&service, kind, group_by.as_deref()).await
        }
        Command::Overview { records, as_of } => {
            let service = build_service(MemoryStore::from_file(&records)?, config)?;
            overview(&service, as_of.unwrap_or_else(Utc::now)).await
        }
    }
}

fn build_service(
    store: MemoryStore,
    config: DashboardConfig,
) -> CliResult<DashboardService<MemoryStore>> {
    let catalog_path = config.catalog_path.clone();
    let service = DashboardService::new(store, config);
    Ok(match catalog_path {
        Some(path) => service.with_catalog_file(&path)?,
        None => service,
    })
}

/// Print the plan a filter resolves to
pub fn explain(
    service: &DashboardService<MemoryStore>,
    kind: RecordKind,
    filter: Option<&str>,
    json: bool,
) -> CliResult<()> {
    let form = FormFilter::parse(kind, read_filter(filter)?)?;
    let plan = service.plan(&form)?;

    if json {
        write_json(&plan)
    } else {
        write_text(&ExplainPlan::from_plan(&plan).to_string())
    }
}

/// Execute a filter and print the matching records
pub async fn query(
    service: &DashboardService<MemoryStore>,
    kind: RecordKind,
    filter: Option<&str>,
) -> CliResult<()> {
    let form = FormFilter::parse(kind, read_filter(filter)?)?;
    let records = service.list(&form).await?;
    write_json(&records)
}

/// Print a whole-collection summary, optionally grouped
pub async fn summary(
    service: &DashboardService<MemoryStore>,
    kind: RecordKind,
    group_by: Option<&str>,
) -> CliResult<()> {
    match group_by {
        Some(field) => {
            let grouped = service.grouped(kind, field).await?;
            let ranked: Vec<Value> = grouped
                .ranked()
                .into_iter()
                .map(|(key, summary)| serde_json::json!({"group": key, "summary": summary}))
                .collect();
            write_json(&ranked)
        }
        None => write_json(&service.summary(kind).await?),
    }
}

/// Print the dashboard overview
pub async fn overview(
    service: &DashboardService<MemoryStore>,
    as_of: DateTime<Utc>,
) -> CliResult<()> {
    let overview = service.overview(as_of).await?;
    write_json(&overview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_form_by_kind() {
        let form = FormFilter::parse(RecordKind::Invoices, json!({"status": "Paga"})).unwrap();
        assert_eq!(form.kind(), RecordKind::Invoices);
        assert_eq!(
            form,
            FormFilter::Invoices(InvoiceFilter::default().with_status("Paga"))
        );
    }

    #[test]
    fn test_unknown_form_field_rejected() {
        let err = FormFilter::parse(RecordKind::Quotes, json!({"numero": "123"})).unwrap_err();
        assert_eq!(err.code_str(), "LV_CLI_INVALID_FILTER");
    }

    #[test]
    fn test_form_filter_delegates_spec() {
        let form = FormFilter::parse(RecordKind::Quotes, json!({"status": "Aprovado"})).unwrap();
        let spec = form.to_spec(7).unwrap();
        assert_eq!(spec.limit(), Some(7));
        assert_eq!(spec.equality_fields().into_iter().collect::<Vec<_>>(), vec!["status"]);
    }
}
