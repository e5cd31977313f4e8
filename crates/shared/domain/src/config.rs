use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed view of the `horizon` configuration namespace.
///
/// The host store keeps the raw tree; this is what the module reads once the
/// defaults are merged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonConfig {
    /// Route prefix for the dashboard.
    pub uri: String,
    /// Broker connection the module stores its data on.
    #[serde(rename = "use")]
    pub use_connection: String,
    /// Key prefix applied to the module's broker connection.
    pub prefix: String,
    pub middleware: Vec<String>,
    /// `"<connection>:<queue>"` -> seconds before a long-wait notification.
    pub waits: BTreeMap<String, u64>,
    pub trim: TrimConfig,
    pub fast_termination: bool,
    /// Master supervisor memory limit in megabytes.
    pub memory_limit: u64,
    /// Environment -> supervisor name -> options.
    pub environments: BTreeMap<String, BTreeMap<String, SupervisorOptions>>,
}

/// Retention windows, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    pub recent: u64,
    pub failed: u64,
    pub monitored: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorOptions {
    pub connection: String,
    pub queue: Vec<String>,
    pub balance: Balance,
    pub processes: u32,
    pub tries: u32,
}

/// Worker balancing strategy for a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Balance {
    #[default]
    Simple,
    Auto,
    Off,
}

impl HorizonConfig {
    /// Supervisors configured for `environment`, if any.
    #[must_use]
    pub fn supervisors(&self, environment: &str) -> Option<&BTreeMap<String, SupervisorOptions>> {
        self.environments.get(environment)
    }
}

// --- Default ---

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            uri: "horizon".to_owned(),
            use_connection: "default".to_owned(),
            prefix: "horizon:".to_owned(),
            middleware: vec!["web".to_owned()],
            waits: BTreeMap::from([("redis:default".to_owned(), 60)]),
            trim: TrimConfig::default(),
            fast_termination: false,
            memory_limit: 64,
            environments: BTreeMap::new(),
        }
    }
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self { recent: 60, failed: 10_080, monitored: 10_080 }
    }
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            connection: "redis".to_owned(),
            queue: vec!["default".to_owned()],
            balance: Balance::Simple,
            processes: 1,
            tries: 1,
        }
    }
}
