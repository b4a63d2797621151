//! Connection configuration.
//!
//! Configuration is a TOML mapping. The only keys the execution layer reads
//! are `grammar` and `log_queries`; anything else is kept in `options` for
//! drivers and query builders.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlExecError};

/// Settings for a single connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Explicit dialect key, overriding the driver's reported name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,

    /// Whether executed statements are appended to the query log.
    #[serde(default = "default_log_queries")]
    pub log_queries: bool,

    /// Any other keys, untouched.
    #[serde(flatten)]
    pub options: BTreeMap<String, toml::Value>,
}

fn default_log_queries() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            grammar: None,
            log_queries: default_log_queries(),
            options: BTreeMap::new(),
        }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SqlExecError::Config(format!("Invalid config: {e}")))
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SqlExecError::Config(format!("Could not read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Force a dialect instead of asking the driver.
    pub fn with_grammar(mut self, dialect: impl Into<String>) -> Self {
        self.grammar = Some(dialect.into());
        self
    }

    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Looks up a pass-through option.
    pub fn option(&self, key: &str) -> Option<&toml::Value> {
        self.options.get(key)
    }
}
