//! Clause evaluation against document bodies
//!
//! No type coercion: a string "100" never matches the number 100. Numbers
//! compare by value, so 100 and 100.0 are equal.

use std::cmp::Ordering;

use serde_json::Value;

use crate::filter::{comparable, compare_values, Predicate};
use crate::planner::{Clause, RangeOp};

/// Evaluates clauses against documents
pub struct ClauseFilter;

impl ClauseFilter {
    /// Checks if a document matches all clauses (AND semantics)
    pub fn matches(document: &Value, clauses: &[Clause]) -> bool {
        clauses
            .iter()
            .all(|clause| Self::matches_clause(document, clause))
    }

    /// Checks residual predicates by translating them to clauses
    pub fn matches_predicates(document: &Value, predicates: &[Predicate]) -> bool {
        predicates.iter().all(|p| {
            Clause::from_predicate(p)
                .iter()
                .all(|clause| Self::matches_clause(document, clause))
        })
    }

    fn matches_clause(document: &Value, clause: &Clause) -> bool {
        let Some(field) = clause.field() else {
            return true;
        };

        let field_value = match document.get(field) {
            Some(v) if !v.is_null() => v,
            // Missing or null fields never match, and are not ordered either.
            _ => return false,
        };

        match clause {
            Clause::Equals { value, .. } => Self::value_eq(field_value, value),
            Clause::AnyOf { values, .. } => values.iter().any(|v| Self::value_eq(field_value, v)),
            Clause::Range { op, value, .. } => Self::range_match(field_value, *op, value),
            Clause::PrefixRange { lower, upper, .. } => match field_value {
                Value::String(s) => s.as_str() >= lower.as_str() && s.as_str() <= upper.as_str(),
                _ => false,
            },
            Clause::OrderBy { .. } | Clause::Limit { .. } => true,
        }
    }

    fn value_eq(actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => a == b,
            },
            _ => actual == expected,
        }
    }

    fn range_match(actual: &Value, op: RangeOp, bound: &Value) -> bool {
        if !comparable(actual, bound) {
            return false;
        }
        let ordering = compare_values(Some(actual), Some(bound));
        match op {
            RangeOp::Gte => ordering != Ordering::Less,
            RangeOp::Lte => ordering != Ordering::Greater,
        }
    }
}
