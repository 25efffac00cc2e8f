//! CLI-specific error types
//!
//! Every CLI error is fatal: the binary prints it and exits non-zero.

use std::io;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::dashboard::DashboardError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Index-definition file error
    CatalogError,
    /// Record file could not be read or parsed
    RecordsError,
    /// Filter argument is not valid JSON or not a valid form
    InvalidFilter,
    /// Query or summary failed
    QueryFailed,
    /// I/O error (stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "LV_CLI_CONFIG_ERROR",
            Self::CatalogError => "LV_CLI_CATALOG_ERROR",
            Self::RecordsError => "LV_CLI_RECORDS_ERROR",
            Self::InvalidFilter => "LV_CLI_INVALID_FILTER",
            Self::QueryFailed => "LV_CLI_QUERY_FAILED",
            Self::IoError => "LV_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {}", .code.code(), .message)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidFilter, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, format!("{} ({})", e, e.code()))
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        Self::new(CliErrorCode::CatalogError, format!("{} ({})", e, e.code()))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::RecordsError, e.to_string())
    }
}

impl From<DashboardError> for CliError {
    fn from(e: DashboardError) -> Self {
        let code = match e {
            DashboardError::Filter(_) => CliErrorCode::InvalidFilter,
            DashboardError::Query(_) => CliErrorCode::QueryFailed,
        };
        Self::new(code, format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterError;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::invalid_filter("expected an object");
        assert_eq!(err.to_string(), "LV_CLI_INVALID_FILTER: expected an object");
    }

    #[test]
    fn test_dashboard_error_mapping() {
        let err: CliError = DashboardError::Filter(FilterError::ZeroLimit).into();
        assert_eq!(err.code(), &CliErrorCode::InvalidFilter);
        assert!(err.message().contains("LV_FILTER_ZERO_LIMIT"));
    }
}
