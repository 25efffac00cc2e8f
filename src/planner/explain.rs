//! Explain output for query plans
//!
//! Produces deterministic, human-readable explain output.

use std::fmt;

use serde::Serialize;

use super::plan::QueryPlan;

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainPlan {
    pub collection: String,
    /// `INDEX` or `FALLBACK`
    pub strategy: &'static str,
    pub index: Option<String>,
    pub clauses: Vec<String>,
    pub residual: Vec<String>,
    pub residual_limit: Option<usize>,
}

impl ExplainPlan {
    pub fn from_plan(plan: &QueryPlan) -> Self {
        let residual = plan
            .residual
            .iter()
            .map(|p| match serde_json::to_string(&p.op) {
                Ok(op) => format!("{} {}", p.field, op),
                Err(_) => format!("{} {}", p.field, p.op.op_name()),
            })
            .collect();

        Self {
            collection: plan.collection.clone(),
            strategy: if plan.used_fallback { "FALLBACK" } else { "INDEX" },
            index: plan.index.as_ref().map(ToString::to_string),
            clauses: plan.clauses.iter().map(ToString::to_string).collect(),
            residual,
            residual_limit: plan.residual_limit,
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Collection: {}", self.collection)?;
        writeln!(f, "Strategy: {}", self.strategy)?;
        if let Some(index) = &self.index {
            writeln!(f, "Index: {}", index)?;
        }
        if !self.clauses.is_empty() {
            writeln!(f, "Store clauses:")?;
            for clause in &self.clauses {
                writeln!(f, "  - {}", clause)?;
            }
        }
        if !self.residual.is_empty() {
            writeln!(f, "Residual filters:")?;
            for pred in &self.residual {
                writeln!(f, "  - {}", pred)?;
            }
        }
        if let Some(limit) = self.residual_limit {
            writeln!(f, "Residual limit: {}", limit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{IndexCatalog, IndexDescriptor};
    use crate::filter::{FilterSpec, SortDirection};
    use crate::planner::QueryPlanner;
    use serde_json::json;

    fn catalog() -> IndexCatalog {
        IndexCatalog::new(
            "orcamentos",
            vec![IndexDescriptor::new(["status"], "dataCriacao", SortDirection::Desc)],
        )
    }

    #[test]
    fn test_explain_index_plan() {
        let catalog = catalog();
        let spec = FilterSpec::builder()
            .eq("status", "Aprovado")
            .order_by("dataCriacao", SortDirection::Desc)
            .limit(10)
            .build()
            .unwrap();

        let explain = ExplainPlan::from_plan(&QueryPlanner::new(&catalog).plan(&spec));
        assert_eq!(explain.strategy, "INDEX");
        assert_eq!(explain.index.as_deref(), Some("[status] sort dataCriacao desc"));

        let output = explain.to_string();
        assert!(output.contains("equals(status, \"Aprovado\")"));
        assert!(output.contains("orderBy(dataCriacao, desc)"));
        assert!(output.contains("limit(10)"));
    }

    #[test]
    fn test_explain_fallback_plan() {
        let catalog = catalog();
        let spec = FilterSpec::builder()
            .eq("status", "Aprovado")
            .range("valor", Some(json!(100)), None)
            .order_by("dataCriacao", SortDirection::Desc)
            .limit(3)
            .build()
            .unwrap();

        let explain = ExplainPlan::from_plan(&QueryPlanner::new(&catalog).plan(&spec));
        assert_eq!(explain.strategy, "FALLBACK");
        assert!(explain.index.is_none());

        let output = explain.to_string();
        assert!(output.contains("Residual filters:"));
        assert!(output.contains("valor"));
        assert!(output.contains("Residual limit: 3"));
    }

    #[test]
    fn test_explain_deterministic() {
        let catalog = catalog();
        let spec = FilterSpec::builder()
            .eq("status", "Pendente")
            .order_by("dataCriacao", SortDirection::Desc)
            .build()
            .unwrap();
        let planner = QueryPlanner::new(&catalog);

        let first = ExplainPlan::from_plan(&planner.plan(&spec)).to_string();
        let second = ExplainPlan::from_plan(&planner.plan(&spec)).to_string();
        assert_eq!(first, second);
    }
}
