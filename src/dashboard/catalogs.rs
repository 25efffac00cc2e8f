//! Built-in index catalogs
//!
//! Mirrors the composite indexes deployed for each collection. Built once
//! per process and shared without locking.

use std::sync::OnceLock;

use crate::catalog::{IndexCatalog, IndexDescriptor};
use crate::filter::SortDirection::{Asc, Desc};

use super::schema::{invoice, quote, RecordKind};

static QUOTE_CATALOG: OnceLock<IndexCatalog> = OnceLock::new();
static INVOICE_CATALOG: OnceLock<IndexCatalog> = OnceLock::new();

pub fn builtin_catalog(kind: RecordKind) -> &'static IndexCatalog {
    match kind {
        RecordKind::Quotes => QUOTE_CATALOG.get_or_init(quote_catalog),
        RecordKind::Invoices => INVOICE_CATALOG.get_or_init(invoice_catalog),
    }
}

fn quote_catalog() -> IndexCatalog {
    use quote::*;

    IndexCatalog::new(
        COLLECTION,
        vec![
            // Listing by creation date
            IndexDescriptor::sorted(CREATED_AT, Desc),
            IndexDescriptor::sorted(CREATED_AT, Desc).with_range(CREATED_AT),
            IndexDescriptor::new([STATUS], CREATED_AT, Desc),
            IndexDescriptor::new([CLIENT], CREATED_AT, Desc),
            IndexDescriptor::new([SERVICE_TYPE], CREATED_AT, Desc),
            IndexDescriptor::new([STATUS, CLIENT], CREATED_AT, Desc),
            IndexDescriptor::new([STATUS, SERVICE_TYPE], CREATED_AT, Desc),
            IndexDescriptor::new([STATUS], CREATED_AT, Desc).with_range(CREATED_AT),
            // Amount ranges
            IndexDescriptor::sorted(AMOUNT, Desc).with_range(AMOUNT),
            IndexDescriptor::new([STATUS], AMOUNT, Desc).with_range(AMOUNT),
            // Client-name search
            IndexDescriptor::sorted(CLIENT_SEARCH, Asc).with_range(CLIENT_SEARCH),
            IndexDescriptor::new([STATUS], CLIENT_SEARCH, Asc).with_range(CLIENT_SEARCH),
        ],
    )
}

fn invoice_catalog() -> IndexCatalog {
    use invoice::*;

    IndexCatalog::new(
        COLLECTION,
        vec![
            IndexDescriptor::sorted(ISSUED_AT, Desc),
            IndexDescriptor::sorted(ISSUED_AT, Desc).with_range(ISSUED_AT),
            IndexDescriptor::new([STATUS], ISSUED_AT, Desc),
            IndexDescriptor::new([CLIENT], ISSUED_AT, Desc),
            IndexDescriptor::new([STATUS, CLIENT], ISSUED_AT, Desc),
            IndexDescriptor::new([STATUS], ISSUED_AT, Desc).with_range(ISSUED_AT),
            // Due-date tracking
            IndexDescriptor::new([STATUS], DUE_AT, Asc).with_range(DUE_AT),
            IndexDescriptor::sorted(AMOUNT, Desc).with_range(AMOUNT),
            IndexDescriptor::new([STATUS], AMOUNT, Desc).with_range(AMOUNT),
            IndexDescriptor::sorted(CLIENT_SEARCH, Asc).with_range(CLIENT_SEARCH),
            IndexDescriptor::new([STATUS], CLIENT_SEARCH, Asc).with_range(CLIENT_SEARCH),
        ],
    )
}
