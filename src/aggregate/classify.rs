//! Classification table
//!
//! Maps status values to summary buckets. Status lookup trims and ignores
//! case, so `" aprovado"` and `"Aprovado"` land in the same bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Default number of decimals kept by derived rates
pub const DEFAULT_RATE_PRECISION: u32 = 1;

/// Upper bound accepted for rate precision
pub const MAX_RATE_PRECISION: u32 = 4;

/// How one status value is accumulated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRule {
    /// Bucket incremented by this status; `None` counts as unknown
    pub bucket: Option<String>,
    /// Whether the amount joins the overall total (false for voided states)
    pub counts_toward_total: bool,
    /// Whether the bucket keeps a monetary sum
    pub monetary: bool,
}

impl StatusRule {
    pub fn bucket(name: impl Into<String>) -> Self {
        Self {
            bucket: Some(name.into()),
            counts_toward_total: true,
            monetary: false,
        }
    }

    pub fn monetary(mut self) -> Self {
        self.monetary = true;
        self
    }

    /// Voided statuses never contribute to the overall total
    pub fn voided(mut self) -> Self {
        self.counts_toward_total = false;
        self
    }
}

/// Denominator of a derived rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBase {
    /// Every record seen, unknown ones included
    Total,
    /// Sum of the listed bucket counts
    Buckets(Vec<String>),
}

/// A percentage derived from final bucket counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRule {
    pub name: String,
    pub numerator: Vec<String>,
    pub denominator: RateBase,
}

impl RateRule {
    /// `bucket / total`
    pub fn share_of_total(name: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            numerator: vec![bucket.into()],
            denominator: RateBase::Total,
        }
    }
}

/// Data-driven status classification for one record kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTable {
    status_field: String,
    amount_field: String,
    /// Keyed by normalized status
    rules: BTreeMap<String, StatusRule>,
    rates: Vec<RateRule>,
    precision: u32,
}

impl ClassificationTable {
    pub fn new(status_field: impl Into<String>, amount_field: impl Into<String>) -> Self {
        Self {
            status_field: status_field.into(),
            amount_field: amount_field.into(),
            rules: BTreeMap::new(),
            rates: Vec::new(),
            precision: DEFAULT_RATE_PRECISION,
        }
    }

    pub fn with_status(mut self, status: &str, rule: StatusRule) -> Self {
        self.rules.insert(normalize_status(status), rule);
        self
    }

    pub fn with_rate(mut self, rate: RateRule) -> Self {
        self.rates.push(rate);
        self
    }

    /// Decimals kept by derived rates, clamped to `MAX_RATE_PRECISION`
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.min(MAX_RATE_PRECISION);
        self
    }

    pub fn status_field(&self) -> &str {
        &self.status_field
    }

    pub fn amount_field(&self) -> &str {
        &self.amount_field
    }

    pub fn rates(&self) -> &[RateRule] {
        &self.rates
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Every declared bucket with its monetary flag, in name order
    pub fn buckets(&self) -> BTreeMap<&str, bool> {
        let mut buckets = BTreeMap::new();
        for rule in self.rules.values() {
            if let Some(bucket) = rule.bucket.as_deref() {
                let monetary = buckets.entry(bucket).or_insert(false);
                *monetary |= rule.monetary;
            }
        }
        buckets
    }

    /// Rule for a raw status value
    pub fn rule(&self, status: &str) -> Option<&StatusRule> {
        self.rules.get(&normalize_status(status))
    }

    /// Rule for a record's status field; `None` when missing or unrecognized
    pub fn classify(&self, record: &Record) -> Option<&StatusRule> {
        record
            .text(&self.status_field)
            .and_then(|status| self.rule(status))
    }
}

fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> ClassificationTable {
        ClassificationTable::new("status", "valor")
            .with_status("Pendente", StatusRule::bucket("pendente"))
            .with_status("Aprovado", StatusRule::bucket("aprovado").monetary())
            .with_status("Cancelado", StatusRule::bucket("cancelado").voided())
            .with_rate(RateRule::share_of_total("taxa_aprovacao", "aprovado"))
    }

    #[test]
    fn test_status_lookup_ignores_case_and_padding() {
        let table = table();
        assert_eq!(
            table.rule(" APROVADO ").and_then(|r| r.bucket.as_deref()),
            Some("aprovado")
        );
        assert!(table.rule("Arquivado").is_none());
    }

    #[test]
    fn test_classify_record() {
        let table = table();
        let voided = Record::new("1", json!({"status": "Cancelado", "valor": 10}));
        let missing = Record::new("2", json!({"valor": 10}));

        let rule = table.classify(&voided).unwrap();
        assert!(!rule.counts_toward_total);
        assert!(table.classify(&missing).is_none());
    }

    #[test]
    fn test_buckets_carry_monetary_flag() {
        let table = table();
        let buckets = table.buckets();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets.get("aprovado"), Some(&true));
        assert_eq!(buckets.get("pendente"), Some(&false));
    }

    #[test]
    fn test_precision_is_clamped() {
        assert_eq!(table().with_precision(9).precision(), MAX_RATE_PRECISION);
        assert_eq!(table().precision(), DEFAULT_RATE_PRECISION);
    }
}
