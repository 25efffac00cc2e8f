//! Executor error types
//!
//! Store failures are surfaced unchanged, wrapped with the collection and
//! plan that were being executed.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Executor error with execution context
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    #[error("Query on '{collection}' failed ({plan}): {source}")]
    Store {
        collection: String,
        plan: String,
        #[source]
        source: StoreError,
    },
}

impl ExecutorError {
    /// Stable error code (the store's code)
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::Store { source, .. } => source.code(),
        }
    }

    /// The underlying store failure
    pub fn store_error(&self) -> &StoreError {
        match self {
            ExecutorError::Store { source, .. } => source,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.store_error().is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_context() {
        let err = ExecutorError::Store {
            collection: "notasFiscais".into(),
            plan: "notasFiscais full scan".into(),
            source: StoreError::Unavailable("connection reset".into()),
        };

        let display = err.to_string();
        assert!(display.contains("notasFiscais"));
        assert!(display.contains("full scan"));
        assert!(display.contains("connection reset"));
        assert_eq!(err.code(), "LV_STORE_UNAVAILABLE");
        assert!(err.is_transient());
    }
}
