//! Observability subsystem
//!
//! - Structured logging through `tracing`, every line tagged with an [`Event`]
//! - Lock-free counters in [`MetricsRegistry`]
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on planning or aggregation results
//! 3. Degraded paths (fallback plans, unclassified records) are always visible
//!
//! # Usage
//!
//! ```ignore
//! use ledgerview::observability::{Event, MetricsRegistry};
//!
//! tracing::warn!(event = %Event::FallbackPlanUsed, collection = "orcamentos", "fallback plan");
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_plan(true);
//! ```

mod events;
mod metrics;

pub use events::Event;
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "LEDGERVIEW_LOG";

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `LEDGERVIEW_LOG` when set, otherwise from
/// `default_directive`. Returns false when a subscriber was already set.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
