//! Dashboard domain layer
//!
//! Quotes (`orcamentos`) and invoices (`notasFiscais`) share one planner and
//! one aggregator; this module supplies the data that differs per kind:
//! field names, built-in index catalogs, classification tables, and the
//! filter forms of the listing screens.

mod catalogs;
mod errors;
mod filters;
mod rules;
mod schema;
mod service;

pub use catalogs::builtin_catalog;
pub use errors::{DashboardError, DashboardResult};
pub use filters::{InvoiceFilter, QuoteFilter, RecordFilter};
pub use rules::{classification_table, invoice_buckets, quote_buckets};
pub use schema::{invoice, quote, RecordKind};
pub use service::{margin, DashboardService, Overview};
