//! Dashboard filter forms
//!
//! Each form maps the optional inputs of a listing screen onto a
//! [`FilterSpec`]. Blank inputs are ignored.
//!
//! Sort when none is requested: client search orders by the search field,
//! an amount range orders by amount, everything else by the kind's date
//! field, newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::{timestamp_value, FilterResult, FilterSpec, Predicate, SortSpec};

use super::schema::{invoice, quote, RecordKind};

/// A filter form that resolves to a [`FilterSpec`]
pub trait RecordFilter {
    fn kind(&self) -> RecordKind;

    /// Builds the `FilterSpec`, applying `default_limit` when the form sets none
    fn to_spec(&self, default_limit: usize) -> FilterResult<FilterSpec>;
}

/// Quote listing form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuoteFilter {
    pub status: Option<String>,
    pub client: Option<String>,
    pub service_type: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    /// Case-insensitive client-name prefix
    pub client_search: Option<String>,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl QuoteFilter {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_amount_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn with_client_search(mut self, text: impl Into<String>) -> Self {
        self.client_search = Some(text.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl RecordFilter for QuoteFilter {
    fn kind(&self) -> RecordKind {
        RecordKind::Quotes
    }

    fn to_spec(&self, default_limit: usize) -> FilterResult<FilterSpec> {
        let amount = amount_range(quote::AMOUNT, self.min_amount, self.max_amount);
        let search = text(&self.client_search).map(|t| Predicate::prefix(quote::CLIENT_SEARCH, t));
        let sort = self
            .sort
            .clone()
            .unwrap_or_else(|| default_sort(self.kind(), search.as_ref(), amount.as_ref()));

        FilterSpec::builder()
            .filter_opt(text(&self.status).map(|s| Predicate::eq(quote::STATUS, s)))
            .filter_opt(text(&self.client).map(|c| Predicate::eq(quote::CLIENT, c)))
            .filter_opt(text(&self.service_type).map(|t| Predicate::eq(quote::SERVICE_TYPE, t)))
            .filter_opt(amount)
            .filter_opt(date_range(quote::CREATED_AT, self.created_from, self.created_to))
            .filter_opt(search)
            .sort(sort)
            .limit(self.limit.unwrap_or(default_limit))
            .build()
    }
}

/// Invoice listing form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvoiceFilter {
    pub status: Option<String>,
    pub client: Option<String>,
    pub number: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub issued_from: Option<DateTime<Utc>>,
    pub issued_to: Option<DateTime<Utc>>,
    pub client_search: Option<String>,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl InvoiceFilter {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_issue_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.issued_from = from;
        self.issued_to = to;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl RecordFilter for InvoiceFilter {
    fn kind(&self) -> RecordKind {
        RecordKind::Invoices
    }

    fn to_spec(&self, default_limit: usize) -> FilterResult<FilterSpec> {
        let amount = amount_range(invoice::AMOUNT, self.min_amount, self.max_amount);
        let search =
            text(&self.client_search).map(|t| Predicate::prefix(invoice::CLIENT_SEARCH, t));
        let sort = self
            .sort
            .clone()
            .unwrap_or_else(|| default_sort(self.kind(), search.as_ref(), amount.as_ref()));

        FilterSpec::builder()
            .filter_opt(text(&self.status).map(|s| Predicate::eq(invoice::STATUS, s)))
            .filter_opt(text(&self.client).map(|c| Predicate::eq(invoice::CLIENT, c)))
            .filter_opt(text(&self.number).map(|n| Predicate::eq(invoice::NUMBER, n)))
            .filter_opt(amount)
            .filter_opt(date_range(invoice::ISSUED_AT, self.issued_from, self.issued_to))
            .filter_opt(search)
            .sort(sort)
            .limit(self.limit.unwrap_or(default_limit))
            .build()
    }
}

fn text(input: &Option<String>) -> Option<&str> {
    input.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn amount_range(field: &str, min: Option<f64>, max: Option<f64>) -> Option<Predicate> {
    let bound = |v: Option<f64>| v.filter(|v| v.is_finite()).map(Value::from);
    match (bound(min), bound(max)) {
        (None, None) => None,
        (lower, upper) => Some(Predicate::range(field, lower, upper)),
    }
}

fn date_range(
    field: &str,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Option<Predicate> {
    match (from, to) {
        (None, None) => None,
        (from, to) => Some(Predicate::range(
            field,
            from.map(timestamp_value),
            to.map(timestamp_value),
        )),
    }
}

fn default_sort(kind: RecordKind, search: Option<&Predicate>, amount: Option<&Predicate>) -> SortSpec {
    if let Some(search) = search {
        return SortSpec::asc(search.field.clone());
    }
    if let Some(amount) = amount {
        return SortSpec::desc(amount.field.clone());
    }
    SortSpec::desc(kind.date_field())
}
