//! Classification tables for quotes and invoices

use crate::aggregate::{ClassificationTable, RateRule, StatusRule};

use super::schema::{invoice, quote, RecordKind};

/// Quote buckets
pub mod quote_buckets {
    pub const PENDING: &str = "pendente";
    pub const APPROVED: &str = "aprovado";
    pub const REJECTED: &str = "rejeitado";
    pub const CANCELLED: &str = "cancelado";

    pub const APPROVAL_RATE: &str = "taxa_aprovacao";
    pub const REJECTION_RATE: &str = "taxa_rejeicao";
}

/// Invoice buckets
pub mod invoice_buckets {
    pub const PENDING: &str = "pendente";
    pub const PAID: &str = "paga";
    pub const OVERDUE: &str = "vencida";
    pub const CANCELLED: &str = "cancelada";

    pub const PAYMENT_RATE: &str = "taxa_pagamento";
}

pub fn classification_table(kind: RecordKind, precision: u32) -> ClassificationTable {
    match kind {
        RecordKind::Quotes => quote_table(),
        RecordKind::Invoices => invoice_table(),
    }
    .with_precision(precision)
}

fn quote_table() -> ClassificationTable {
    use quote_buckets::*;

    ClassificationTable::new(quote::STATUS, quote::AMOUNT)
        .with_status(quote::PENDING, StatusRule::bucket(PENDING))
        .with_status(quote::APPROVED, StatusRule::bucket(APPROVED).monetary())
        .with_status(quote::REJECTED, StatusRule::bucket(REJECTED))
        .with_status(quote::CANCELLED, StatusRule::bucket(CANCELLED).voided())
        .with_rate(RateRule::share_of_total(APPROVAL_RATE, APPROVED))
        .with_rate(RateRule::share_of_total(REJECTION_RATE, REJECTED))
}

fn invoice_table() -> ClassificationTable {
    use invoice_buckets::*;

    ClassificationTable::new(invoice::STATUS, invoice::AMOUNT)
        .with_status(invoice::PENDING, StatusRule::bucket(PENDING).monetary())
        .with_status(invoice::PAID, StatusRule::bucket(PAID).monetary())
        .with_status(invoice::OVERDUE, StatusRule::bucket(OVERDUE).monetary())
        .with_status(invoice::CANCELLED, StatusRule::bucket(CANCELLED).voided())
        .with_rate(RateRule::share_of_total(PAYMENT_RATE, PAID))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{summarize, Cents};
    use crate::store::Record;
    use serde_json::json;

    #[test]
    fn test_invoice_summary() {
        let table = classification_table(RecordKind::Invoices, 1);
        let records = vec![
            Record::new("1", json!({"status": "Paga", "valor": 1000})),
            Record::new("2", json!({"status": "Paga", "valor": 500.5})),
            Record::new("3", json!({"status": "Vencida", "valor": 300})),
            Record::new("4", json!({"status": "Cancelada", "valor": 9000})),
        ];

        let summary = summarize(&table, &records);
        assert_eq!(summary.count(invoice_buckets::PAID), 2);
        assert_eq!(summary.amount(invoice_buckets::PAID), Cents::new(150050));
        assert_eq!(summary.amount(invoice_buckets::OVERDUE), Cents::new(30000));
        assert_eq!(summary.total_amount, Cents::new(180050));
        assert_eq!(summary.rate(invoice_buckets::PAYMENT_RATE), 50.0);
    }

    #[test]
    fn test_quote_rates() {
        let table = classification_table(RecordKind::Quotes, 2);
        let records = vec![
            Record::new("1", json!({"status": "Aprovado", "valor": 10})),
            Record::new("2", json!({"status": "Rejeitado", "valor": 10})),
            Record::new("3", json!({"status": "Pendente", "valor": 10})),
        ];

        let summary = summarize(&table, &records);
        assert_eq!(summary.rate(quote_buckets::APPROVAL_RATE), 33.33);
        assert_eq!(summary.rate(quote_buckets::REJECTION_RATE), 33.33);
        assert_eq!(summary.counts.len(), 4);
    }
}
