//! Store error types
//!
//! The core never retries; `is_transient` only tells the caller whether a
//! retry could help.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a store while executing a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Network or availability failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured timeout
    #[error("Store did not answer within {0} ms")]
    Timeout(u64),

    /// The store refused the query (e.g. unsupported clause combination)
    #[error("Store rejected query: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "LV_STORE_UNAVAILABLE",
            StoreError::Timeout(_) => "LV_STORE_TIMEOUT",
            StoreError::Rejected(_) => "LV_STORE_REJECTED",
        }
    }
}
