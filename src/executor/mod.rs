//! Query executor subsystem
//!
//! Consumes plans and produces ordered record lists.
//!
//! # Execution Flow (strict order)
//!
//! 1. Resolve the plan
//! 2. Submit store clauses (single suspension point, bounded by a timeout)
//! 3. Filter residual predicates
//! 4. Apply residual limit
//! 5. Return ordered results
//!
//! # Invariants
//!
//! - No silent retries: a store failure is returned once, with context
//! - Residual work never reorders what the store returned

mod errors;
mod executor;
mod filters;
mod sorter;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::ClauseFilter;
pub use sorter::ResultSorter;
