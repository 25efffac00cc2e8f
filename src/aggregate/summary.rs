//! Summary results
//!
//! Monetary values are held in integer cents. Summing integers is exact,
//! so totals do not depend on record order.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Serialize, Serializer};

/// Monetary amount in cents
///
/// Single amounts fit in `i64`; sums are held in `i128` so that adding
/// any realistic number of amounts never saturates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i128);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(cents: i64) -> Self {
        Cents(i128::from(cents))
    }

    /// Rounds a decimal amount to the nearest cent, clamped to the `i64` range
    pub fn from_amount(amount: f64) -> Self {
        Cents::new((amount * 100.0).round() as i64)
    }

    /// Scales by `ratio`, rounding to the nearest cent
    pub fn scale(self, ratio: f64) -> Self {
        Cents((self.0 as f64 * ratio).round() as i128)
    }

    pub fn as_amount(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn get(self) -> i128 {
        self.0
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        *self = *self + rhs;
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Serialized as a decimal amount
impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_amount())
    }
}

/// Roll-up of one record set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRecord {
    /// Records seen
    pub total: u64,
    /// Records with a missing or unrecognized status
    pub unknown: u64,
    /// Records missing status or amount (counted once per record)
    pub anomalies: u64,
    /// Count per declared bucket, zero when nothing matched
    pub counts: BTreeMap<String, u64>,
    /// Monetary sum per monetary bucket
    pub amounts: BTreeMap<String, Cents>,
    /// Sum over every non-voided record
    pub total_amount: Cents,
    /// Derived percentages
    pub rates: BTreeMap<String, f64>,
}

impl SummaryRecord {
    pub fn count(&self, bucket: &str) -> u64 {
        self.counts.get(bucket).copied().unwrap_or(0)
    }

    pub fn amount(&self, bucket: &str) -> Cents {
        self.amounts.get(bucket).copied().unwrap_or(Cents::ZERO)
    }

    pub fn rate(&self, name: &str) -> f64 {
        self.rates.get(name).copied().unwrap_or(0.0)
    }

    /// Records that landed in a bucket
    pub fn classified(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_degraded(&self) -> bool {
        self.unknown > 0 || self.anomalies > 0
    }
}

/// One summary per grouping key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedSummary {
    groups: BTreeMap<String, SummaryRecord>,
}

impl GroupedSummary {
    pub(crate) fn from_groups(groups: BTreeMap<String, SummaryRecord>) -> Self {
        Self { groups }
    }

    pub fn get(&self, key: &str) -> Option<&SummaryRecord> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryRecord)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Groups by descending total amount, ties by key
    pub fn ranked(&self) -> Vec<(&str, &SummaryRecord)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_amount.cmp(&a.1.total_amount).then(a.0.cmp(b.0)));
        ranked
    }

    /// Records across all groups
    pub fn total(&self) -> u64 {
        self.groups.values().map(|s| s.total).sum()
    }
}
