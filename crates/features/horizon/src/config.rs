//! Layers Horizon's defaults into the host configuration and derives the
//! module's broker connection.

use crate::error::{BootstrapError, BootstrapErrorExt};
use hzn_domain::config::HorizonConfig;
use hzn_kernel::config::{ConfigError, ConfigStore};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration namespace owned by the module.
pub const NAMESPACE: &str = "horizon";

/// Name of the broker connection the module writes through.
pub const CONNECTION: &str = "horizon";

/// Root of the host's broker connections.
const BROKER_ROOT: &str = "database.redis";

#[derive(Debug, Clone)]
pub struct ConfigMerger {
    defaults: PathBuf,
}

impl ConfigMerger {
    pub fn new(defaults: impl Into<PathBuf>) -> Self {
        Self { defaults: defaults.into() }
    }

    #[must_use]
    pub fn defaults_path(&self) -> &Path {
        &self.defaults
    }

    /// Fills missing top-level `horizon.*` keys from the defaults document and
    /// returns the typed result. Host values always win. Safe to repeat.
    ///
    /// # Errors
    /// [`BootstrapError::ConfigLoad`] when the document is unreadable or the
    /// merged namespace does not fit [`HorizonConfig`].
    pub fn merge(&self, store: &ConfigStore) -> Result<HorizonConfig, BootstrapError> {
        let added = store
            .merge_namespace(NAMESPACE, &self.defaults)
            .context("Failed to merge horizon defaults")?;
        debug!(added = ?added, "Horizon defaults merged");

        Self::current(store)
    }

    /// Typed view of the live `horizon` namespace.
    ///
    /// # Errors
    /// [`BootstrapError::ConfigLoad`] when the namespace is missing or malformed.
    pub fn current(store: &ConfigStore) -> Result<HorizonConfig, BootstrapError> {
        store
            .get::<HorizonConfig>(NAMESPACE)
            .context("Failed to read horizon configuration")?
            .ok_or_else(|| {
                ConfigError::Missing { message: "[horizon] namespace is empty".into(), context: None }.into()
            })
    }

    /// Copies the host connection `database.redis.<use>` to
    /// `database.redis.horizon`, tagged with the module's key prefix.
    ///
    /// # Errors
    /// [`BootstrapError::ConfigLoad`] when the selected connection does not exist.
    pub fn use_connection(store: &ConfigStore, config: &HorizonConfig) -> Result<(), BootstrapError> {
        let source_key = format!("{BROKER_ROOT}.{}", config.use_connection);

        let Some(Value::Object(mut connection)) = store.value(&source_key) else {
            return Err(ConfigError::Missing {
                message: format!("broker connection [{}] is not configured", config.use_connection).into(),
                context: None,
            })
            .context("Failed to select horizon connection");
        };

        connection.insert("prefix".to_owned(), Value::String(config.prefix.clone()));
        store.set(&format!("{BROKER_ROOT}.{CONNECTION}"), Value::Object(connection));

        info!(from = %config.use_connection, prefix = %config.prefix, "Horizon broker connection selected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn defaults(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("horizon.toml");
        fs::write(&path, "uri = \"horizon\"\nuse = \"default\"\nprefix = \"horizon:\"\nmiddleware = [\"web\"]\n")
            .unwrap();
        path
    }

    #[test]
    fn host_values_win() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::from_value(json!({ "horizon": { "uri": "jobs" } })).unwrap();

        let config = ConfigMerger::new(defaults(&dir)).merge(&store).unwrap();
        assert_eq!(config.uri, "jobs");
        assert_eq!(config.middleware, vec!["web"]);
    }

    #[test]
    fn unreadable_defaults_are_config_load_errors() {
        let err = ConfigMerger::new("/nowhere/horizon.toml").merge(&ConfigStore::new()).unwrap_err();
        assert!(matches!(err, BootstrapError::ConfigLoad { .. }));
    }

    #[test]
    fn mistyped_host_value_fails_validation() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::from_value(json!({ "horizon": { "middleware": 5 } })).unwrap();
        let err = ConfigMerger::new(defaults(&dir)).merge(&store).unwrap_err();
        assert_eq!(err.kind(), "ConfigLoad");
    }

    #[test]
    fn mode_switch_copies_the_selected_connection() {
        let store = ConfigStore::from_value(json!({
            "database": { "redis": { "cache": { "host": "cache.internal", "port": 6380 } } }
        }))
        .unwrap();
        let config = HorizonConfig { use_connection: "cache".into(), ..HorizonConfig::default() };

        ConfigMerger::use_connection(&store, &config).unwrap();
        assert_eq!(
            store.value("database.redis.horizon"),
            Some(json!({ "host": "cache.internal", "port": 6380, "prefix": "horizon:" }))
        );
        assert_eq!(store.value("database.redis.cache.prefix"), None, "source connection untouched");
    }

    #[test]
    fn mode_switch_requires_the_connection() {
        let err = ConfigMerger::use_connection(&ConfigStore::new(), &HorizonConfig::default()).unwrap_err();
        assert!(err.to_string().contains("broker connection [default] is not configured"));
    }
}
