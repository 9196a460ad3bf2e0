//! Connection configuration.
//!
//! ```json
//! {
//!   "default": "main",
//!   "connections": {
//!     "main": { "driver": "mysql", "prefix": "app_", "dsn": "user:pass@tcp(localhost:3306)/app" }
//!   }
//! }
//! ```

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings for one named connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Dialect name. Only `mysql` has a grammar.
    pub driver: String,
    /// Prefix applied to every table name.
    #[serde(default)]
    pub prefix: String,
    /// Driver-specific connection string, passed to the connector untouched.
    pub dsn: String,
}

impl DatabaseConfig {
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            prefix: String::new(),
            dsn: dsn.into(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Every named connection plus the name used when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    pub default: String,
    #[serde(default)]
    pub connections: BTreeMap<String, DatabaseConfig>,
}

impl ManagerConfig {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            connections: BTreeMap::new(),
        }
    }

    /// Register a named connection.
    pub fn with_connection(mut self, name: impl Into<String>, config: DatabaseConfig) -> Self {
        self.connections.insert(name.into(), config);
        self
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> OrmResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the default connection exists.
    pub fn validate(&self) -> OrmResult<()> {
        if !self.connections.contains_key(&self.default) {
            return Err(OrmError::config(format!(
                "default connection `{}` is not configured",
                self.default
            )));
        }
        Ok(())
    }

    /// The settings of a named connection.
    pub fn get(&self, name: &str) -> OrmResult<&DatabaseConfig> {
        self.connections
            .get(name)
            .ok_or_else(|| OrmError::config(format!("connection `{name}` is not configured")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "default": "main",
        "connections": {
            "main": { "driver": "mysql", "prefix": "app_", "dsn": "root@/app" },
            "logs": { "driver": "mysql", "dsn": "root@/logs" }
        }
    }"#;

    #[test]
    fn parses_json() {
        let config = ManagerConfig::from_json(JSON).unwrap();
        assert_eq!(config.default, "main");
        assert_eq!(config.get("main").unwrap().prefix, "app_");
        assert_eq!(config.get("logs").unwrap().prefix, "");
    }

    #[test]
    fn unknown_connection_is_a_config_error() {
        let config = ManagerConfig::from_json(JSON).unwrap();
        assert!(matches!(config.get("missing"), Err(OrmError::Config(_))));
    }

    #[test]
    fn missing_default_is_rejected() {
        let err = ManagerConfig::from_json(r#"{ "default": "x", "connections": {} }"#).unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = ManagerConfig::from_json("{").unwrap_err();
        assert!(matches!(err, OrmError::Serialization(_)));
    }
}
