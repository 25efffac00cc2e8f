//! Single-pass accumulators
//!
//! Counters and sums are updated per record; rates are derived once, in
//! `finish()`, from the final counts.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::observability::Event;
use crate::store::Record;

use super::classify::{ClassificationTable, RateBase, RateRule};
use super::summary::{Cents, GroupedSummary, SummaryRecord};

/// Group assigned to records with a missing, null, or blank key
pub const UNSPECIFIED_GROUP: &str = "unspecified";

/// Accumulates one summary
#[derive(Debug, Clone)]
pub struct SummaryAccumulator<'t> {
    table: &'t ClassificationTable,
    total: u64,
    unknown: u64,
    anomalies: u64,
    counts: BTreeMap<String, u64>,
    amounts: BTreeMap<String, Cents>,
    total_amount: Cents,
}

impl<'t> SummaryAccumulator<'t> {
    /// Starts with every declared bucket at zero
    pub fn new(table: &'t ClassificationTable) -> Self {
        let mut counts = BTreeMap::new();
        let mut amounts = BTreeMap::new();
        for (bucket, monetary) in table.buckets() {
            counts.insert(bucket.to_string(), 0);
            if monetary {
                amounts.insert(bucket.to_string(), Cents::ZERO);
            }
        }

        Self {
            table,
            total: 0,
            unknown: 0,
            anomalies: 0,
            counts,
            amounts,
            total_amount: Cents::ZERO,
        }
    }

    pub fn push(&mut self, record: &Record) {
        self.total += 1;

        let status_present = record.text(self.table.status_field()).is_some();
        let amount = record.amount(self.table.amount_field());
        if !status_present || amount.is_none() {
            self.anomalies += 1;
        }
        let amount = amount.map(Cents::from_amount).unwrap_or(Cents::ZERO);

        let rule = self.table.classify(record);
        let bucket = rule.and_then(|r| r.bucket.as_deref());

        match (rule, bucket) {
            (Some(rule), Some(bucket)) => {
                *self.counts.entry(bucket.to_string()).or_insert(0) += 1;
                if rule.monetary {
                    *self.amounts.entry(bucket.to_string()).or_insert(Cents::ZERO) += amount;
                }
            }
            _ => self.unknown += 1,
        }

        // Unknown statuses are not voided; only an explicit rule can exclude
        if rule.map_or(true, |r| r.counts_toward_total) {
            self.total_amount += amount;
        }
    }

    pub fn extend<'r>(&mut self, records: impl IntoIterator<Item = &'r Record>) {
        for record in records {
            self.push(record);
        }
    }

    pub fn finish(self) -> SummaryRecord {
        let precision = self.table.precision();
        let rates = self
            .table
            .rates()
            .iter()
            .map(|rule| (rule.name.clone(), self.derive_rate(rule, precision)))
            .collect();

        if self.unknown > 0 || self.anomalies > 0 {
            warn!(
                event = %Event::AggregationInputDegraded,
                total = self.total,
                unknown = self.unknown,
                anomalies = self.anomalies,
                "records outside the classification table"
            );
        }
        debug!(event = %Event::AggregationComplete, total = self.total);

        SummaryRecord {
            total: self.total,
            unknown: self.unknown,
            anomalies: self.anomalies,
            counts: self.counts,
            amounts: self.amounts,
            total_amount: self.total_amount,
            rates,
        }
    }

    fn derive_rate(&self, rule: &RateRule, precision: u32) -> f64 {
        let numerator: u64 = rule.numerator.iter().map(|b| self.count(b)).sum();
        let denominator = match &rule.denominator {
            RateBase::Total => self.total,
            RateBase::Buckets(buckets) => buckets.iter().map(|b| self.count(b)).sum(),
        };
        percentage(numerator, denominator, precision)
    }

    fn count(&self, bucket: &str) -> u64 {
        self.counts.get(bucket).copied().unwrap_or(0)
    }
}

/// Accumulates one summary per grouping key
#[derive(Debug, Clone)]
pub struct GroupedAccumulator<'t> {
    table: &'t ClassificationTable,
    groups: BTreeMap<String, SummaryAccumulator<'t>>,
}

impl<'t> GroupedAccumulator<'t> {
    pub fn new(table: &'t ClassificationTable) -> Self {
        Self {
            table,
            groups: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, key: Option<&str>, record: &Record) {
        let key = match key.map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => UNSPECIFIED_GROUP,
        };

        let table = self.table;
        self.groups
            .entry(key.to_string())
            .or_insert_with(|| SummaryAccumulator::new(table))
            .push(record);
    }

    pub fn finish(self) -> GroupedSummary {
        let groups = self
            .groups
            .into_iter()
            .map(|(key, acc)| (key, acc.finish()))
            .collect();
        GroupedSummary::from_groups(groups)
    }
}

/// `100 * numerator / denominator`, rounded to `precision` decimals; 0 when
/// the denominator is 0.
pub fn percentage(numerator: u64, denominator: u64, precision: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let factor = 10f64.powi(precision as i32);
    let raw = numerator as f64 * 100.0 / denominator as f64;
    (raw * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::StatusRule;
    use serde_json::json;

    fn table() -> ClassificationTable {
        ClassificationTable::new("status", "valor")
            .with_status("Pendente", StatusRule::bucket("pendente"))
            .with_status("Aprovado", StatusRule::bucket("aprovado").monetary())
            .with_status("Cancelado", StatusRule::bucket("cancelado").voided())
            .with_status("Arquivado", StatusRule {
                bucket: None,
                counts_toward_total: true,
                monetary: false,
            })
            .with_rate(RateRule::share_of_total("taxa_aprovacao", "aprovado"))
    }

    fn record(id: &str, body: serde_json::Value) -> Record {
        Record::new(id, body)
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(2, 3, 1), 66.7);
        assert_eq!(percentage(1, 3, 2), 33.33);
        assert_eq!(percentage(1, 0, 1), 0.0);
        assert_eq!(percentage(3, 3, 0), 100.0);
    }

    #[test]
    fn test_empty_accumulator_has_zeroed_buckets() {
        let table = table();
        let summary = SummaryAccumulator::new(&table).finish();

        assert_eq!(summary.total, 0);
        assert_eq!(summary.counts.len(), 3);
        assert_eq!(summary.amounts.len(), 1);
        assert_eq!(summary.rate("taxa_aprovacao"), 0.0);
    }

    #[test]
    fn test_voided_excluded_from_total_amount() {
        let table = table();
        let mut acc = SummaryAccumulator::new(&table);
        acc.push(&record("1", json!({"status": "Aprovado", "valor": 200})));
        acc.push(&record("2", json!({"status": "Cancelado", "valor": 999})));

        let summary = acc.finish();
        assert_eq!(summary.count("cancelado"), 1);
        assert_eq!(summary.total_amount, Cents::new(20000));
    }

    #[test]
    fn test_unknown_status_counts_toward_total_amount() {
        let table = table();
        let mut acc = SummaryAccumulator::new(&table);
        acc.push(&record("1", json!({"status": "Em análise", "valor": 40})));
        acc.push(&record("2", json!({"status": "Arquivado", "valor": 10})));

        let summary = acc.finish();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.unknown, 2);
        assert_eq!(summary.anomalies, 0);
        assert_eq!(summary.classified(), 0);
        assert_eq!(summary.total_amount, Cents::new(5000));
    }

    #[test]
    fn test_missing_fields_are_anomalies_once() {
        let table = table();
        let mut acc = SummaryAccumulator::new(&table);
        acc.push(&record("1", json!({})));
        acc.push(&record("2", json!({"status": "Aprovado", "valor": "abc"})));
        acc.push(&record("3", json!({"status": null, "valor": 5})));

        let summary = acc.finish();
        assert_eq!(summary.anomalies, 3);
        assert_eq!(summary.unknown, 2);
        assert_eq!(summary.count("aprovado"), 1);
        assert_eq!(summary.amount("aprovado"), Cents::ZERO);
        assert_eq!(summary.total_amount, Cents::new(500));
    }

    #[test]
    fn test_grouped_blank_keys_are_unspecified() {
        let table = table();
        let mut acc = GroupedAccumulator::new(&table);
        let r = record("1", json!({"status": "Pendente", "valor": 1}));
        acc.push(Some("A"), &r);
        acc.push(Some("  "), &r);
        acc.push(None, &r);

        let grouped = acc.finish();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get("A").map(|s| s.total), Some(1));
        assert_eq!(grouped.get(UNSPECIFIED_GROUP).map(|s| s.total), Some(2));
    }
}
