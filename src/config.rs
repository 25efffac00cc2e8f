//! Dashboard configuration
//!
//! Loaded from a JSON file. Every key is optional; missing keys take their
//! defaults and the result is validated before use.
//!
//! ```json
//! {
//!   "store_timeout_ms": 10000,
//!   "default_limit": 50,
//!   "margin_cost_ratio": 0.7,
//!   "rate_precision": 1,
//!   "catalog_path": "./indexes.json"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::aggregate::MAX_RATE_PRECISION;
use crate::observability::Event;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "LV_CONFIG_IO",
            ConfigError::Parse(_) => "LV_CONFIG_PARSE",
            ConfigError::Invalid(_) => "LV_CONFIG_INVALID",
        }
    }
}

/// Runtime settings for the dashboard service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Upper bound on a single store execution
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Limit applied to listings that do not set one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Share of gross quote value treated as cost when computing margin
    #[serde(default = "default_margin_cost_ratio")]
    pub margin_cost_ratio: f64,

    /// Decimals kept by derived rates
    #[serde(default = "default_rate_precision")]
    pub rate_precision: u32,

    /// Index-definition file replacing the built-in catalogs
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn default_store_timeout_ms() -> u64 {
    10_000
}
fn default_limit() -> usize {
    50
}
fn default_margin_cost_ratio() -> f64 {
    0.7
}
fn default_rate_precision() -> u32 {
    1
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            default_limit: default_limit(),
            margin_cost_ratio: default_margin_cost_ratio(),
            rate_precision: default_rate_precision(),
            catalog_path: None,
        }
    }
}

impl DashboardConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json(&content)?;
        info!(event = %Event::ConfigLoaded, path = %path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::Invalid("store_timeout_ms must be > 0".into()));
        }

        if self.default_limit == 0 {
            return Err(ConfigError::Invalid("default_limit must be > 0".into()));
        }

        if !(0.0..=1.0).contains(&self.margin_cost_ratio) {
            return Err(ConfigError::Invalid(format!(
                "margin_cost_ratio must be within 0..=1, got {}",
                self.margin_cost_ratio
            )));
        }

        if self.rate_precision > MAX_RATE_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "rate_precision must be at most {}, got {}",
                MAX_RATE_PRECISION, self.rate_precision
            )));
        }

        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_object_takes_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
        assert_eq!(config.margin_cost_ratio, 0.7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{"store_timeout_ms": 0}"#,
            r#"{"default_limit": 0}"#,
            r#"{"margin_cost_ratio": 1.5}"#,
            r#"{"margin_cost_ratio": -0.1}"#,
            r#"{"rate_precision": 5}"#,
        ] {
            let err = DashboardConfig::from_json(json).unwrap_err();
            assert_eq!(err.code(), "LV_CONFIG_INVALID", "{}", json);
        }
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = DashboardConfig::from_json(r#"{"timeout": 5}"#).unwrap_err();
        assert_eq!(err.code(), "LV_CONFIG_PARSE");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_limit": 20, "rate_precision": 2}}"#).unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.rate_precision, 2);
        assert_eq!(config.store_timeout_ms, 10_000);
    }

    #[test]
    fn test_missing_file() {
        let err = DashboardConfig::load(Path::new("/nonexistent/ledgerview.json")).unwrap_err();
        assert_eq!(err.code(), "LV_CONFIG_IO");
    }
}
