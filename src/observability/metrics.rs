//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for planning, store execution and aggregation.
///
/// All counters use `Relaxed` atomics; readers only need eventually
/// consistent values.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    queries_planned: AtomicU64,
    fallback_plans: AtomicU64,
    store_failures: AtomicU64,
    records_returned: AtomicU64,
    summaries_computed: AtomicU64,
    records_aggregated: AtomicU64,
    unclassified_records: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Query metrics

    /// Records one planned query and whether it fell back
    pub fn record_plan(&self, used_fallback: bool) {
        self.queries_planned.fetch_add(1, Ordering::Relaxed);
        if used_fallback {
            self.fallback_plans.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_records_returned(&self, count: u64) {
        self.records_returned.fetch_add(count, Ordering::Relaxed);
    }

    // Aggregation metrics

    /// Records one finished summary
    pub fn record_summary(&self, records: u64, unclassified: u64) {
        self.summaries_computed.fetch_add(1, Ordering::Relaxed);
        self.records_aggregated.fetch_add(records, Ordering::Relaxed);
        self.unclassified_records
            .fetch_add(unclassified, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_planned: self.queries_planned.load(Ordering::Relaxed),
            fallback_plans: self.fallback_plans.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            summaries_computed: self.summaries_computed.load(Ordering::Relaxed),
            records_aggregated: self.records_aggregated.load(Ordering::Relaxed),
            unclassified_records: self.unclassified_records.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_planned: u64,
    pub fallback_plans: u64,
    pub store_failures: u64,
    pub records_returned: u64,
    pub summaries_computed: u64,
    pub records_aggregated: u64,
    pub unclassified_records: u64,
}
