//! Dashboard error types

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::filter::FilterError;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Query(#[from] ExecutorError),
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::Filter(e) => e.code(),
            DashboardError::Query(e) => e.code(),
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, DashboardError::Query(e) if e.is_transient())
    }
}
