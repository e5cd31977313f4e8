//! Job lifecycle events and the listeners Horizon attaches to them.

use crate::error::BootstrapError;
use fxhash::FxHashSet;
use hzn_domain::EventBinding;
use hzn_events::Dispatcher;
use tracing::debug;

pub const JOB_PUSHED: &str = "horizon.job_pushed";
pub const JOB_RESERVED: &str = "horizon.job_reserved";
pub const JOB_RELEASED: &str = "horizon.job_released";
pub const JOB_DELETED: &str = "horizon.job_deleted";
pub const JOB_FAILED: &str = "horizon.job_failed";
/// Raised by the host queue, not by Horizon.
pub const QUEUE_JOB_FAILED: &str = "queue.job_failed";
pub const JOBS_MIGRATED: &str = "horizon.jobs_migrated";
pub const MASTER_SUPERVISOR_LOOPED: &str = "horizon.master_supervisor_looped";
pub const SUPERVISOR_LOOPED: &str = "horizon.supervisor_looped";
pub const WORKER_PROCESS_RESTARTING: &str = "horizon.worker_process_restarting";
pub const SUPERVISOR_PROCESS_RESTARTING: &str = "horizon.supervisor_process_restarting";
pub const LONG_WAIT_DETECTED: &str = "horizon.long_wait_detected";

/// Event name to ordered listener ids. Every event appears once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMap {
    bindings: Vec<EventBinding>,
}

impl EventMap {
    /// # Errors
    /// [`BootstrapError::DuplicateEventDeclaration`] when an event is listed twice.
    pub fn new(bindings: Vec<EventBinding>) -> Result<Self, BootstrapError> {
        let mut seen = FxHashSet::default();
        for binding in &bindings {
            if !seen.insert(binding.event.as_str()) {
                return Err(BootstrapError::DuplicateEventDeclaration {
                    message: binding.event.clone().into(),
                    context: None,
                });
            }
        }
        Ok(Self { bindings })
    }

    /// The map Horizon ships with.
    #[must_use]
    pub fn horizon() -> Self {
        Self {
            bindings: vec![
                EventBinding::new(JOB_PUSHED, ["store_job", "store_monitored_tags"]),
                EventBinding::new(JOB_RESERVED, ["mark_job_as_reserved", "start_timing_job"]),
                EventBinding::new(JOB_RELEASED, ["mark_job_as_released"]),
                EventBinding::new(JOB_DELETED, ["mark_job_as_complete", "update_job_metrics"]),
                EventBinding::new(JOB_FAILED, ["marshal_failed_event"]),
                EventBinding::new(QUEUE_JOB_FAILED, ["mark_job_as_failed", "store_tags_for_failed_job"]),
                EventBinding::new(JOBS_MIGRATED, ["mark_jobs_as_migrated"]),
                EventBinding::new(
                    MASTER_SUPERVISOR_LOOPED,
                    [
                        "trim_recent_jobs",
                        "trim_failed_jobs",
                        "trim_monitored_jobs",
                        "expire_supervisors",
                        "monitor_master_supervisor_memory",
                    ],
                ),
                EventBinding::new(
                    SUPERVISOR_LOOPED,
                    ["prune_terminating_processes", "monitor_supervisor_memory", "monitor_waiting_times"],
                ),
                EventBinding::new(WORKER_PROCESS_RESTARTING, ["mark_process_as_restarting"]),
                EventBinding::new(SUPERVISOR_PROCESS_RESTARTING, ["mark_process_as_restarting"]),
                EventBinding::new(LONG_WAIT_DETECTED, ["send_notification"]),
            ],
        }
    }

    #[must_use]
    pub fn bindings(&self) -> &[EventBinding] {
        &self.bindings
    }

    /// Attaches every listener in declared order and returns how many were
    /// attached. Calling it twice attaches everything twice.
    pub fn register_events(&self, dispatcher: &Dispatcher) -> usize {
        let mut attached = 0;
        for binding in &self.bindings {
            for listener in &binding.listeners {
                dispatcher.listen(binding.event.as_str(), listener.as_str());
                attached += 1;
            }
            debug!(event = %binding.event, listeners = binding.listeners.len(), "Event listeners attached");
        }
        attached
    }
}

impl Default for EventMap {
    fn default() -> Self {
        Self::horizon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_map_is_valid() {
        let map = EventMap::horizon();
        assert!(EventMap::new(map.bindings().to_vec()).is_ok());
        assert_eq!(map.bindings().len(), 12);
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = EventMap::new(vec![
            EventBinding::new(JOB_PUSHED, ["a"]),
            EventBinding::new(JOB_PUSHED, ["b"]),
        ])
        .unwrap_err();
        assert!(matches!(err, BootstrapError::DuplicateEventDeclaration { .. }));
    }

    #[test]
    fn listeners_attach_in_order() {
        let dispatcher = Dispatcher::new();
        let attached = EventMap::horizon().register_events(&dispatcher);

        assert_eq!(attached, 22);
        assert_eq!(dispatcher.listeners(JOB_DELETED), vec!["mark_job_as_complete", "update_job_metrics"]);
        assert_eq!(dispatcher.listeners(MASTER_SUPERVISOR_LOOPED).len(), 5);
    }
}
