//! Broker (redis) connection settings, built from `database.redis`.
//!
//! Only configuration lives here. Nothing opens a socket; modules hand the
//! connection description to whatever client the deployment uses.

use crate::app::{Application, BoxError, ServiceProvider};
use crate::config::ConfigStore;
use crate::container::ContainerError;
use crate::keys;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Keys under `database.redis` that are not connections.
const RESERVED: [&str; 2] = ["client", "options"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConnection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: u32,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Key prefix applied to everything written through this connection.
    #[serde(default)]
    pub prefix: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

const fn default_port() -> u16 {
    6379
}

impl BrokerConnection {
    #[must_use]
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Named broker connections.
#[derive(Debug, Clone, Default)]
pub struct BrokerManager {
    client: String,
    connections: BTreeMap<String, BrokerConnection>,
}

impl BrokerManager {
    /// Reads `database.redis` from the live configuration.
    ///
    /// # Errors
    /// Fails when the section is missing or a connection is malformed.
    pub fn from_config(config: &ConfigStore) -> Result<Self, ContainerError> {
        let Some(Value::Object(section)) = config.value("database.redis") else {
            return Err(ContainerError::Resolution {
                message: "no broker connections configured under [database.redis]".into(),
                context: None,
            });
        };

        let client = section.get("client").and_then(Value::as_str).unwrap_or("native").to_owned();
        let mut connections = BTreeMap::new();

        for (name, value) in section {
            if RESERVED.contains(&name.as_str()) {
                continue;
            }
            let connection: BrokerConnection =
                serde_json::from_value(value).map_err(|e| ContainerError::Resolution {
                    message: format!("broker connection [{name}]: {e}").into(),
                    context: None,
                })?;
            if connection.host.is_empty() {
                return Err(ContainerError::Resolution {
                    message: format!("broker connection [{name}] has an empty host").into(),
                    context: None,
                });
            }
            connections.insert(name, connection);
        }

        debug!(client = %client, connections = connections.len(), "Broker manager built");
        Ok(Self { client, connections })
    }

    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    #[must_use]
    pub fn connection(&self, name: &str) -> Option<&BrokerConnection> {
        self.connections.get(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.connections.keys().map(String::as_str).collect()
    }
}

/// Binds the broker manager as a lazily built singleton under [`keys::BROKER`].
#[derive(Debug, Default)]
pub struct BrokerServiceProvider;

impl ServiceProvider for BrokerServiceProvider {
    fn name(&self) -> &'static str {
        "broker"
    }

    fn register(&self, app: &Application) -> Result<(), BoxError> {
        let config = app.config().clone();
        app.container().singleton(keys::BROKER, move |_| BrokerManager::from_config(&config));
        Ok(())
    }
}
