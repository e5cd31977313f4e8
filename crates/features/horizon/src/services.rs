//! Service handles Horizon binds into the host container.
//!
//! The job-monitoring logic itself lives elsewhere; these handles carry the
//! broker connection the real implementations write through.

use crate::config::CONNECTION;
use fxhash::FxHashMap;
use hzn_kernel::broker::{BrokerConnection, BrokerManager};
use hzn_kernel::container::{Container, ContainerError};
use hzn_kernel::keys;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// The module's broker connection, resolved from the host broker manager.
///
/// # Errors
/// Fails when the broker manager cannot be built or has no `horizon` connection.
pub fn horizon_connection(container: &Container) -> Result<BrokerConnection, ContainerError> {
    let broker = container.resolve::<BrokerManager>(keys::BROKER)?;
    broker.connection(CONNECTION).cloned().ok_or_else(|| ContainerError::Resolution {
        message: format!("broker connection [{CONNECTION}] is not configured").into(),
        context: None,
    })
}

macro_rules! broker_service {
    ($($(#[$meta:meta])* $name:ident => $id:literal;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $name {
                connection: BrokerConnection,
            }

            impl $name {
                pub const ID: &'static str = $id;

                #[must_use]
                pub const fn new(connection: BrokerConnection) -> Self {
                    Self { connection }
                }

                /// Builds the service on the module's broker connection.
                ///
                /// # Errors
                /// See [`horizon_connection`].
                pub fn from_container(container: &Container) -> Result<Self, ContainerError> {
                    horizon_connection(container).map(Self::new)
                }

                #[must_use]
                pub const fn connection(&self) -> &BrokerConnection {
                    &self.connection
                }
            }
        )+
    };
}

broker_service! {
    /// Rebalances worker processes across queues.
    AutoScaler => "horizon.auto_scaler";
    TrimRecentJobs => "horizon.listeners.trim_recent_jobs";
    TrimFailedJobs => "horizon.listeners.trim_failed_jobs";
    TrimMonitoredJobs => "horizon.listeners.trim_monitored_jobs";
    /// Broker-backed mutex for supervisor coordination.
    Lock => "horizon.lock";
    RedisCommandQueue => "horizon.redis_command_queue";
    RedisJobRepository => "horizon.repositories.redis_job_repository";
    RedisMasterSupervisorRepository => "horizon.repositories.redis_master_supervisor_repository";
    RedisMetricsRepository => "horizon.repositories.redis_metrics_repository";
    RedisProcessRepository => "horizon.repositories.redis_process_repository";
    RedisSupervisorRepository => "horizon.repositories.redis_supervisor_repository";
    RedisTagRepository => "horizon.repositories.redis_tag_repository";
    RedisWorkloadRepository => "horizon.repositories.redis_workload_repository";
}

/// Named in-process timers.
#[derive(Debug, Default)]
pub struct Stopwatch {
    timers: Mutex<FxHashMap<String, Instant>>,
}

impl Stopwatch {
    pub const ID: &'static str = "horizon.stopwatch";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, key: impl Into<String>) {
        self.timers.lock().insert(key.into(), Instant::now());
    }

    /// Time since `start(key)`, if it was started.
    #[must_use]
    pub fn check(&self, key: &str) -> Option<Duration> {
        self.timers.lock().get(key).map(Instant::elapsed)
    }

    pub fn forget(&self, key: &str) {
        self.timers.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hzn_kernel::config::ConfigStore;
    use serde_json::json;

    #[test]
    fn services_use_the_horizon_connection() {
        let config = ConfigStore::from_value(json!({
            "database": { "redis": { "horizon": { "host": "10.1.1.1", "prefix": "horizon:" } } }
        }))
        .unwrap();
        let container = Container::new();
        container.singleton(keys::BROKER, move |_| BrokerManager::from_config(&config));

        let lock = Lock::from_container(&container).unwrap();
        assert_eq!(lock.connection().host, "10.1.1.1");
        assert_eq!(lock.connection().prefix.as_deref(), Some("horizon:"));
    }

    #[test]
    fn missing_connection_is_a_resolution_error() {
        let config =
            ConfigStore::from_value(json!({ "database": { "redis": { "default": {} } } })).unwrap();
        let container = Container::new();
        container.singleton(keys::BROKER, move |_| BrokerManager::from_config(&config));

        let err = RedisJobRepository::from_container(&container).unwrap_err();
        assert_eq!(err.kind(), "Resolution");
    }

    #[test]
    fn stopwatch_tracks_named_timers() {
        let watch = Stopwatch::new();
        watch.start("job-1");
        assert!(watch.check("job-1").is_some());
        watch.forget("job-1");
        assert!(watch.check("job-1").is_none());
    }
}
