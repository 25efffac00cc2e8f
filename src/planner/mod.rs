//! Query planner subsystem
//!
//! The planner produces deterministic plans and never fails.
//!
//! # Design Principles
//!
//! - Deterministic: same spec + same catalog → structurally equal plan
//! - Total: no composite index means the fallback plan, not an error
//! - Store-legal: every plan respects the store's single-inequality rule
//!
//! # Index Selection Priority (strict order)
//!
//! 1. Largest equality-field set
//! 2. Declared range field matching the query's range predicate
//! 3. Catalog declaration order

mod explain;
mod plan;
mod planner;

pub use explain::ExplainPlan;
pub use plan::{Clause, QueryPlan, RangeOp};
pub use planner::QueryPlanner;
