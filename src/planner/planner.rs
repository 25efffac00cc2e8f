//! Query planner
//!
//! Resolves a [`FilterSpec`] against an [`IndexCatalog`] into exactly one
//! [`QueryPlan`]. Planning is total: when no composite index can serve the
//! spec the fallback plan is returned instead of an error.
//!
//! Candidate ranking (strict order):
//! 1. Most equality fields covered
//! 2. Declared range field matching the query's range predicate
//! 3. Catalog declaration order

use tracing::debug;

use crate::catalog::{IndexCatalog, IndexDescriptor};
use crate::filter::{FilterSpec, Predicate};

use super::plan::{Clause, QueryPlan};

/// Planner over one collection's catalog
pub struct QueryPlanner<'a> {
    catalog: &'a IndexCatalog,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(catalog: &'a IndexCatalog) -> Self {
        Self { catalog }
    }

    /// Plans a query.
    ///
    /// Deterministic: the same spec against the same catalog always yields a
    /// structurally equal plan.
    pub fn plan(&self, spec: &FilterSpec) -> QueryPlan {
        let plan = match self.select_index(spec) {
            Some(index) => self.index_plan(spec, index),
            None => self.fallback_plan(spec),
        };

        debug!(
            collection = %plan.collection,
            used_fallback = plan.used_fallback,
            clauses = plan.clauses.len(),
            residual = plan.residual.len(),
            "query planned"
        );

        plan
    }

    /// Picks the most specific compatible index, if any.
    fn select_index(&self, spec: &FilterSpec) -> Option<&'a IndexDescriptor> {
        // The store allows a single inequality field per query.
        if spec.range_predicates().len() > 1 {
            return None;
        }

        let sort = spec.sort()?;
        let range_field = spec.range_field();
        let equality_fields = spec.equality_fields();

        let mut best: Option<(&IndexDescriptor, (usize, bool))> = None;
        for candidate in self
            .catalog
            .lookup(&equality_fields, range_field, Some(&sort.field))
        {
            if candidate.direction != sort.direction {
                continue;
            }
            // A range can only be combined with an ordering on the same field.
            if range_field.is_some_and(|field| field != candidate.sort) {
                continue;
            }

            let rank = (candidate.specificity(), candidate.range.is_some());
            match best {
                Some((_, best_rank)) if best_rank >= rank => {}
                _ => best = Some((candidate, rank)),
            }
        }

        best.map(|(index, _)| index)
    }

    /// Clause order: index equality fields, remaining equality fields,
    /// range, orderBy, limit.
    fn index_plan(&self, spec: &FilterSpec, index: &IndexDescriptor) -> QueryPlan {
        let mut clauses = Vec::new();

        for field in &index.equality {
            if let Some(predicate) = spec.predicate(field) {
                clauses.extend(Clause::from_predicate(predicate));
            }
        }

        let remaining = spec
            .predicates()
            .iter()
            .filter(|p| p.is_equality_class() && !index.covers_equality(&p.field));
        for predicate in remaining {
            clauses.extend(Clause::from_predicate(predicate));
        }

        for predicate in spec.range_predicates() {
            clauses.extend(Clause::from_predicate(predicate));
        }

        push_order_and_limit(&mut clauses, spec, true);

        QueryPlan {
            collection: self.catalog.collection().to_string(),
            index: Some(index.clone()),
            clauses,
            residual: Vec::new(),
            residual_limit: None,
            used_fallback: false,
        }
    }

    /// Applies every predicate independently, then orderBy and limit.
    ///
    /// Only one range field is pushed to the store: the sort field's range
    /// if there is one, otherwise the first range field when unsorted. The
    /// rest become residual predicates, and the limit moves with them.
    fn fallback_plan(&self, spec: &FilterSpec) -> QueryPlan {
        let ranges = spec.range_predicates();
        let pushed_range = match spec.sort() {
            Some(sort) => ranges.iter().find(|p| p.field == sort.field),
            None => ranges.first(),
        }
        .map(|p| p.field.as_str());

        let mut clauses = Vec::new();
        let mut residual: Vec<Predicate> = Vec::new();
        for predicate in spec.predicates() {
            if predicate.is_range_type() && Some(predicate.field.as_str()) != pushed_range {
                residual.push(predicate.clone());
            } else {
                clauses.extend(Clause::from_predicate(predicate));
            }
        }

        let push_limit = residual.is_empty();
        push_order_and_limit(&mut clauses, spec, push_limit);

        QueryPlan {
            collection: self.catalog.collection().to_string(),
            index: None,
            clauses,
            residual,
            residual_limit: if push_limit { None } else { spec.limit() },
            used_fallback: true,
        }
    }
}

fn push_order_and_limit(clauses: &mut Vec<Clause>, spec: &FilterSpec, push_limit: bool) {
    if let Some(sort) = spec.sort() {
        clauses.push(Clause::OrderBy {
            field: sort.field.clone(),
            direction: sort.direction,
        });
    }
    if push_limit {
        if let Some(n) = spec.limit() {
            clauses.push(Clause::Limit { n });
        }
    }
}
