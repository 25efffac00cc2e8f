//! Store contract
//!
//! The store is an external collaborator: it executes a resolved
//! [`QueryPlan`] and returns records in the order the plan asks for. The
//! core treats `execute` as a suspending call that may fail and never
//! retries it.
//!
//! # Store guarantees assumed by the planner
//!
//! - Range-type clauses target at most one field per query
//! - A range field and `orderBy` may only be combined on the same field
//! - At most one `orderBy` and at most one `limit`

mod errors;
mod memory;
mod record;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::planner::QueryPlan;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use record::Record;

/// Future returned by [`Store::execute`]
pub type StoreFuture<'a> = Pin<Box<dyn Future<Output = StoreResult<Vec<Record>>> + Send + 'a>>;

/// Executes plans against a document collection
pub trait Store: Send + Sync {
    /// Runs the plan's clauses against `plan.collection`
    fn execute<'a>(&'a self, plan: &'a QueryPlan) -> StoreFuture<'a>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn execute<'a>(&'a self, plan: &'a QueryPlan) -> StoreFuture<'a> {
        (**self).execute(plan)
    }
}
