//! Resolved query plans and the store clause vocabulary.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::IndexDescriptor;
use crate::filter::{prefix_bounds, FilterOp, Predicate, SortDirection};

/// Inclusive comparison used by range clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeOp {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
}

impl RangeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeOp::Gte => ">=",
            RangeOp::Lte => "<=",
        }
    }
}

/// One clause submitted to the store, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "clause", rename_all = "snake_case")]
pub enum Clause {
    Equals {
        field: String,
        value: Value,
    },
    AnyOf {
        field: String,
        values: Vec<Value>,
    },
    Range {
        field: String,
        op: RangeOp,
        value: Value,
    },
    PrefixRange {
        field: String,
        lower: String,
        upper: String,
    },
    OrderBy {
        field: String,
        direction: SortDirection,
    },
    Limit {
        n: usize,
    },
}

impl Clause {
    /// Translates a predicate into its store clauses. A two-sided range
    /// becomes two clauses on the same field.
    pub fn from_predicate(predicate: &Predicate) -> Vec<Clause> {
        let field = predicate.field.clone();
        match &predicate.op {
            FilterOp::Eq(value) => vec![Clause::Equals {
                field,
                value: value.clone(),
            }],
            FilterOp::In(values) => vec![Clause::AnyOf {
                field,
                values: values.clone(),
            }],
            FilterOp::Range { lower, upper } => {
                let mut clauses = Vec::with_capacity(2);
                if let Some(lower) = lower {
                    clauses.push(Clause::Range {
                        field: field.clone(),
                        op: RangeOp::Gte,
                        value: lower.clone(),
                    });
                }
                if let Some(upper) = upper {
                    clauses.push(Clause::Range {
                        field,
                        op: RangeOp::Lte,
                        value: upper.clone(),
                    });
                }
                clauses
            }
            FilterOp::Prefix(text) => {
                let (lower, upper) = prefix_bounds(text);
                vec![Clause::PrefixRange {
                    field,
                    lower,
                    upper,
                }]
            }
        }
    }

    /// Field the clause targets, `None` for limit.
    pub fn field(&self) -> Option<&str> {
        match self {
            Clause::Equals { field, .. }
            | Clause::AnyOf { field, .. }
            | Clause::Range { field, .. }
            | Clause::PrefixRange { field, .. }
            | Clause::OrderBy { field, .. } => Some(field),
            Clause::Limit { .. } => None,
        }
    }

    pub fn is_range_type(&self) -> bool {
        matches!(self, Clause::Range { .. } | Clause::PrefixRange { .. })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Equals { field, value } => write!(f, "equals({}, {})", field, value),
            Clause::AnyOf { field, values } => {
                write!(f, "anyOf({}, {})", field, Value::Array(values.clone()))
            }
            Clause::Range { field, op, value } => {
                write!(f, "range({}, {}, {})", field, op.as_str(), value)
            }
            Clause::PrefixRange {
                field,
                lower,
                upper,
            } => write!(f, "prefixRange({}, {:?}, {:?})", field, lower, upper),
            Clause::OrderBy { field, direction } => {
                write!(f, "orderBy({}, {})", field, direction.as_str())
            }
            Clause::Limit { n } => write!(f, "limit({})", n),
        }
    }
}

/// Immutable execution recipe for one query.
///
/// `clauses` go to the store as-is. `residual` predicates and `residual_limit`
/// are applied by the executor to what the store returns; only fallback plans
/// that could not push every predicate carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    pub collection: String,
    pub index: Option<IndexDescriptor>,
    pub clauses: Vec<Clause>,
    pub residual: Vec<Predicate>,
    pub residual_limit: Option<usize>,
    pub used_fallback: bool,
}

impl QueryPlan {
    pub fn has_residual(&self) -> bool {
        !self.residual.is_empty() || self.residual_limit.is_some()
    }

    /// Short one-line description for logs and error context
    pub fn describe(&self) -> String {
        match &self.index {
            Some(index) => format!("{} via index {}", self.collection, index),
            None if self.clauses.is_empty() && self.residual.is_empty() => {
                format!("{} full scan", self.collection)
            }
            None => format!(
                "{} via fallback ({} clauses, {} residual)",
                self.collection,
                self.clauses.len(),
                self.residual.len()
            ),
        }
    }
}
