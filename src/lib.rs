//! ledgerview - query routing and roll-ups for a quotes/invoices dashboard
//!
//! Two concerns share one declarative core:
//! - routing a filter + sort to the narrowest composite index, with a safe
//!   fallback plan when none matches
//! - single-pass summaries (counts, sums, rates) over whole collections

pub mod aggregate;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod executor;
pub mod filter;
pub mod observability;
pub mod planner;
pub mod store;
