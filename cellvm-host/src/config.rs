// cellvm-host - Engine configuration
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Engine configuration loaded from TOML.
//!
//! ```toml
//! juice_limit = 1000000
//! max_depth = 256
//! query_juice_limit = 1000000
//! ```
//!
//! Every key is optional; missing keys take their defaults. Unknown keys are
//! rejected so typos do not silently fall back to defaults.

use std::path::Path;

use cellvm_core::Limits;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Limits applied by an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Juice available to each transaction
    pub juice_limit: i64,
    /// Maximum nested evaluation depth
    pub max_depth: usize,
    /// Juice available to each read-only query
    pub query_juice_limit: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            juice_limit: Limits::DEFAULT_JUICE,
            max_depth: Limits::DEFAULT_MAX_DEPTH,
            query_juice_limit: Limits::DEFAULT_JUICE,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Limits for transactions.
    pub fn limits(&self) -> Limits {
        Limits {
            juice: self.juice_limit,
            max_depth: self.max_depth,
        }
    }

    /// Limits for queries.
    pub fn query_limits(&self) -> Limits {
        self.limits().with_juice(self.query_juice_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial() {
        let config = EngineConfig::from_toml_str("juice_limit = 500\n").unwrap();
        assert_eq!(config.juice_limit, 500);
        assert_eq!(config.max_depth, Limits::DEFAULT_MAX_DEPTH);
        assert_eq!(config.limits().juice, 500);
        assert_eq!(config.query_limits().juice, Limits::DEFAULT_JUICE);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EngineConfig::from_toml_str("juice = 5\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/cellvm.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cellvm.toml"));
    }
}
