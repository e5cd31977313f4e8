//! Lazy singletons Horizon contributes to the host container.

use crate::error::BootstrapError;
use crate::services::{
    AutoScaler, Lock, RedisCommandQueue, RedisJobRepository, RedisMasterSupervisorRepository,
    RedisMetricsRepository, RedisProcessRepository, RedisSupervisorRepository, RedisTagRepository,
    RedisWorkloadRepository, Stopwatch, TrimFailedJobs, TrimMonitoredJobs, TrimRecentJobs,
};
use fxhash::FxHashSet;
use hzn_kernel::container::{Container, ContainerError, Factory, Instance};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const COMMAND_QUEUE: &str = "horizon.contracts.command_queue";
pub const JOB_REPOSITORY: &str = "horizon.contracts.job_repository";
pub const MASTER_SUPERVISOR_REPOSITORY: &str = "horizon.contracts.master_supervisor_repository";
pub const METRICS_REPOSITORY: &str = "horizon.contracts.metrics_repository";
pub const PROCESS_REPOSITORY: &str = "horizon.contracts.process_repository";
pub const SUPERVISOR_REPOSITORY: &str = "horizon.contracts.supervisor_repository";
pub const TAG_REPOSITORY: &str = "horizon.contracts.tag_repository";
pub const WORKLOAD_REPOSITORY: &str = "horizon.contracts.workload_repository";

/// One service the module provides: either self-bound (`key == implementation`)
/// or bound under a contract key.
#[derive(Clone)]
pub struct BindingEntry {
    key: &'static str,
    implementation: &'static str,
    factory: Factory,
}

impl fmt::Debug for BindingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingEntry")
            .field("key", &self.key)
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}

impl BindingEntry {
    /// The implementation id is its own key.
    pub fn self_bound<T, F>(id: &'static str, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        Self::keyed(id, id, factory)
    }

    pub fn keyed<T, F>(key: &'static str, implementation: &'static str, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let factory: Factory =
            Arc::new(move |container: &Container| factory(container).map(|value| Arc::new(value) as Instance));
        Self { key, implementation, factory }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub const fn implementation(&self) -> &'static str {
        self.implementation
    }

    #[must_use]
    pub fn is_self_bound(&self) -> bool {
        self.key == self.implementation
    }
}

/// The module's service bindings. Keys are unique.
#[derive(Debug, Clone)]
pub struct ServiceBindingTable {
    entries: Vec<BindingEntry>,
}

impl ServiceBindingTable {
    /// # Errors
    /// [`BootstrapError::BindingConflict`] when two entries share a key.
    pub fn new(entries: Vec<BindingEntry>) -> Result<Self, BootstrapError> {
        validate(&entries)?;
        Ok(Self { entries })
    }

    /// The bindings Horizon ships with.
    #[must_use]
    pub fn horizon() -> Self {
        Self {
            entries: vec![
                BindingEntry::self_bound(AutoScaler::ID, AutoScaler::from_container),
                BindingEntry::self_bound(TrimRecentJobs::ID, TrimRecentJobs::from_container),
                BindingEntry::self_bound(TrimFailedJobs::ID, TrimFailedJobs::from_container),
                BindingEntry::self_bound(TrimMonitoredJobs::ID, TrimMonitoredJobs::from_container),
                BindingEntry::self_bound(Lock::ID, Lock::from_container),
                BindingEntry::self_bound(Stopwatch::ID, |_: &Container| Ok(Stopwatch::new())),
                BindingEntry::keyed(COMMAND_QUEUE, RedisCommandQueue::ID, RedisCommandQueue::from_container),
                BindingEntry::keyed(JOB_REPOSITORY, RedisJobRepository::ID, RedisJobRepository::from_container),
                BindingEntry::keyed(
                    MASTER_SUPERVISOR_REPOSITORY,
                    RedisMasterSupervisorRepository::ID,
                    RedisMasterSupervisorRepository::from_container,
                ),
                BindingEntry::keyed(
                    METRICS_REPOSITORY,
                    RedisMetricsRepository::ID,
                    RedisMetricsRepository::from_container,
                ),
                BindingEntry::keyed(
                    PROCESS_REPOSITORY,
                    RedisProcessRepository::ID,
                    RedisProcessRepository::from_container,
                ),
                BindingEntry::keyed(
                    SUPERVISOR_REPOSITORY,
                    RedisSupervisorRepository::ID,
                    RedisSupervisorRepository::from_container,
                ),
                BindingEntry::keyed(TAG_REPOSITORY, RedisTagRepository::ID, RedisTagRepository::from_container),
                BindingEntry::keyed(
                    WORKLOAD_REPOSITORY,
                    RedisWorkloadRepository::ID,
                    RedisWorkloadRepository::from_container,
                ),
            ],
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[BindingEntry] {
        &self.entries
    }

    /// Registers every entry as a lazy singleton under its key. Nothing is
    /// built here. Keys are unique: the table was checked when it was built.
    #[must_use]
    pub fn register_services(&self, container: &Container) -> usize {
        for entry in &self.entries {
            container.bind_factory(entry.key, Arc::clone(&entry.factory), true);
            debug!(key = entry.key, implementation = entry.implementation, "Service bound");
        }
        self.entries.len()
    }
}

impl Default for ServiceBindingTable {
    fn default() -> Self {
        Self::horizon()
    }
}

fn validate(entries: &[BindingEntry]) -> Result<(), BootstrapError> {
    let mut keys = FxHashSet::default();
    for entry in entries {
        if !keys.insert(entry.key) {
            return Err(BootstrapError::BindingConflict {
                message: format!("[{}] is bound more than once", entry.key).into(),
                context: None,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_table_is_valid() {
        let table = ServiceBindingTable::horizon();
        assert!(validate(table.entries()).is_ok());
        assert_eq!(table.entries().len(), 14);
        assert_eq!(table.entries().iter().filter(|e| e.is_self_bound()).count(), 6);
    }

    #[test]
    fn duplicate_keys_are_rejected_at_construction() {
        let err = ServiceBindingTable::new(vec![
            BindingEntry::self_bound("svc", |_: &Container| Ok(1_u8)),
            BindingEntry::keyed("svc", "other", |_: &Container| Ok(2_u8)),
        ])
        .unwrap_err();
        assert!(matches!(err, BootstrapError::BindingConflict { .. }));
    }

    #[test]
    fn registration_is_lazy() {
        let container = Container::new();
        assert_eq!(ServiceBindingTable::horizon().register_services(&container), 14);

        assert!(container.bound(Stopwatch::ID));
        assert!(container.bound(JOB_REPOSITORY));
        assert!(!container.bound(RedisJobRepository::ID), "keyed entries bind only the contract key");
        assert!(!container.resolved(Stopwatch::ID));

        let watch = container.resolve::<Stopwatch>(Stopwatch::ID).unwrap();
        assert!(Arc::ptr_eq(&watch, &container.resolve::<Stopwatch>(Stopwatch::ID).unwrap()));
    }
}
