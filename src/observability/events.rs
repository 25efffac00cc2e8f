//! Observable events
//!
//! Every log line emitted by the core carries one of these names in its
//! `event` field, so log consumers can match on stable identifiers.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// Index-definition file loaded
    CatalogLoaded,

    // Query
    /// Plan resolved to a composite index
    QueryPlanned,
    /// Plan resolved to the fallback path
    FallbackPlanUsed,
    /// Store returned records
    QueryExecuted,
    /// Store failed or timed out
    StoreExecutionFailed,

    // Aggregation
    /// Summary computed
    AggregationComplete,
    /// Records fell outside the classification table or lacked fields
    AggregationInputDegraded,

    // Dashboard
    /// Overview computed for both record kinds
    OverviewComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::FallbackPlanUsed => "QUERY_FALLBACK_PLAN",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::StoreExecutionFailed => "STORE_EXECUTION_FAILED",
            Event::AggregationComplete => "AGGREGATION_COMPLETE",
            Event::AggregationInputDegraded => "AGGREGATION_INPUT_DEGRADED",
            Event::OverviewComplete => "OVERVIEW_COMPLETE",
        }
    }

    /// Degraded events are logged at WARN
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Event::FallbackPlanUsed | Event::StoreExecutionFailed | Event::AggregationInputDegraded
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::CatalogLoaded,
            Event::QueryPlanned,
            Event::FallbackPlanUsed,
            Event::QueryExecuted,
            Event::StoreExecutionFailed,
            Event::AggregationComplete,
            Event::AggregationInputDegraded,
            Event::OverviewComplete,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_degraded_events() {
        assert!(Event::FallbackPlanUsed.is_degraded());
        assert!(Event::StoreExecutionFailed.is_degraded());
        assert!(!Event::QueryPlanned.is_degraded());
        assert!(!Event::AggregationComplete.is_degraded());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::FallbackPlanUsed), "QUERY_FALLBACK_PLAN");
    }
}
