//! Aggregation subsystem
//!
//! Reduces record sequences into [`SummaryRecord`] and [`GroupedSummary`]
//! values in a single forward pass, driven by a [`ClassificationTable`].
//!
//! # Invariants
//!
//! - `total` equals the number of records pushed
//! - bucket counts plus `unknown` equal `total`
//! - counts and sums do not depend on record order
//! - rates are derived once, from final counts
//! - aggregation never fails; bad input degrades into `unknown`,
//!   `anomalies`, and the `"unspecified"` group

mod accumulator;
mod classify;
mod summary;

pub use accumulator::{percentage, GroupedAccumulator, SummaryAccumulator, UNSPECIFIED_GROUP};
pub use classify::{
    ClassificationTable, RateBase, RateRule, StatusRule, DEFAULT_RATE_PRECISION,
    MAX_RATE_PRECISION,
};
pub use summary::{Cents, GroupedSummary, SummaryRecord};

use futures_util::{Stream, StreamExt};

use crate::store::Record;

/// Summarizes any sequence of records
pub fn summarize<'r>(
    table: &ClassificationTable,
    records: impl IntoIterator<Item = &'r Record>,
) -> SummaryRecord {
    let mut acc = SummaryAccumulator::new(table);
    acc.extend(records);
    acc.finish()
}

/// Summarizes records per key returned by `key`
pub fn summarize_grouped<'r, F>(
    table: &ClassificationTable,
    records: impl IntoIterator<Item = &'r Record>,
    key: F,
) -> GroupedSummary
where
    F: Fn(&Record) -> Option<String>,
{
    let mut acc = GroupedAccumulator::new(table);
    for record in records {
        acc.push(key(record).as_deref(), record);
    }
    acc.finish()
}

/// Summarizes a stream without materializing it
pub async fn summarize_stream<S>(table: &ClassificationTable, records: S) -> SummaryRecord
where
    S: Stream<Item = Record>,
{
    let mut acc = SummaryAccumulator::new(table);
    let mut records = std::pin::pin!(records);
    while let Some(record) = records.next().await {
        acc.push(&record);
    }
    acc.finish()
}

/// Grouping function reading a scalar field (see [`Record::key`])
pub fn group_by_field(field: &str) -> impl Fn(&Record) -> Option<String> + '_ {
    move |record| record.key(field)
}
