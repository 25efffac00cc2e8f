//! FilterSpec: the validated, immutable form of a caller's query intent.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ast::{FilterOp, Predicate, SortDirection, SortSpec};
use super::errors::{FilterError, FilterResult};
use super::ordering::{comparable, compare_values};

/// Largest membership list the store accepts in one clause.
pub const MAX_MEMBERSHIP_VALUES: usize = 30;

/// Normalized query intent: one predicate per field, optional sort and limit.
///
/// Predicates are kept ordered by field name so that equal intents compare
/// equal regardless of the order they were added in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
    sort: Option<SortSpec>,
    limit: Option<usize>,
}

impl FilterSpec {
    /// Starts a builder
    pub fn builder() -> FilterSpecBuilder {
        FilterSpecBuilder::default()
    }

    /// A spec with no predicates, no sort and no limit (full collection).
    pub fn all() -> Self {
        Self {
            predicates: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn predicate(&self, field: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.field == field)
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Fields constrained by equality or membership
    pub fn equality_fields(&self) -> BTreeSet<&str> {
        self.predicates
            .iter()
            .filter(|p| p.is_equality_class())
            .map(|p| p.field.as_str())
            .collect()
    }

    /// Range and prefix predicates, in field order
    pub fn range_predicates(&self) -> Vec<&Predicate> {
        self.predicates.iter().filter(|p| p.is_range_type()).collect()
    }

    /// The single range-type field, if exactly one is present.
    pub fn range_field(&self) -> Option<&str> {
        match self.range_predicates().as_slice() {
            [only] => Some(only.field.as_str()),
            _ => None,
        }
    }
}

/// Accumulates predicates and validates them once in [`build`](Self::build).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSpecBuilder {
    predicates: Vec<Predicate>,
    sort: Option<SortSpec>,
    limit: Option<usize>,
}

impl FilterSpecBuilder {
    /// Adds a predicate
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Adds an optional predicate; `None` is a no-op
    pub fn filter_opt(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(p) => self.filter(p),
            None => self,
        }
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Predicate::eq(field, value))
    }

    pub fn range(self, field: impl Into<String>, lower: Option<Value>, upper: Option<Value>) -> Self {
        self.filter(Predicate::range(field, lower, upper))
    }

    pub fn prefix(self, field: impl Into<String>, text: &str) -> Self {
        self.filter(Predicate::prefix(field, text))
    }

    pub fn one_of(self, field: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        self.filter(Predicate::one_of(field, values))
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn order_by(self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort(SortSpec {
            field: field.into(),
            direction,
        })
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Validates and freezes the filter.
    pub fn build(self) -> FilterResult<FilterSpec> {
        let mut predicates = self.predicates;
        predicates.sort_by(|a, b| a.field.cmp(&b.field));

        for pair in predicates.windows(2) {
            if pair[0].field == pair[1].field {
                return Err(FilterError::DuplicateField(pair[0].field.clone()));
            }
        }
        for predicate in &predicates {
            validate_predicate(predicate)?;
        }

        if let Some(sort) = &self.sort {
            if sort.field.trim().is_empty() {
                return Err(FilterError::EmptySort);
            }
            let off_sort: Vec<String> = predicates
                .iter()
                .filter(|p| p.is_range_type() && p.field != sort.field)
                .map(|p| p.field.clone())
                .collect();
            if off_sort.len() > 1 {
                return Err(FilterError::RangeSortConflict {
                    fields: off_sort,
                    sort: sort.field.clone(),
                });
            }
        }

        if self.limit == Some(0) {
            return Err(FilterError::ZeroLimit);
        }

        Ok(FilterSpec {
            predicates,
            sort: self.sort,
            limit: self.limit,
        })
    }
}

fn validate_predicate(predicate: &Predicate) -> FilterResult<()> {
    let field = &predicate.field;
    if field.trim().is_empty() {
        return Err(FilterError::EmptyField);
    }

    match &predicate.op {
        FilterOp::Eq(_) => Ok(()),
        FilterOp::Range { lower: None, upper: None } => Err(FilterError::EmptyRange(field.clone())),
        FilterOp::Range {
            lower: Some(lower),
            upper: Some(upper),
        } if comparable(lower, upper)
            && compare_values(Some(lower), Some(upper)) == Ordering::Greater =>
        {
            Err(FilterError::InvertedRange(field.clone()))
        }
        FilterOp::Range { .. } => Ok(()),
        FilterOp::Prefix(text) if text.is_empty() => Err(FilterError::EmptyPrefix(field.clone())),
        FilterOp::Prefix(_) => Ok(()),
        FilterOp::In(values) if values.is_empty() || values.len() > MAX_MEMBERSHIP_VALUES => {
            Err(FilterError::MembershipSize {
                field: field.clone(),
                max: MAX_MEMBERSHIP_VALUES,
            })
        }
        FilterOp::In(_) => Ok(()),
    }
}
