//! Catalog loading errors

use thiserror::Error;

/// Result type for catalog loading
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures while loading an index-definition file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read index definitions from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid index definition JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid index descriptor {0}")]
    InvalidDescriptor(String),
}

impl CatalogError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Io { .. } => "LV_CATALOG_IO",
            CatalogError::Parse(_) => "LV_CATALOG_PARSE",
            CatalogError::InvalidDescriptor(_) => "LV_CATALOG_INVALID_DESCRIPTOR",
        }
    }
}
