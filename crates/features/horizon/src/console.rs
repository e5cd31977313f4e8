use hzn_kernel::queue::QueueWorker;
use std::sync::Arc;

/// Container key of the shared work command.
pub const WORK_COMMAND: &str = "horizon.console.work";

/// `horizon:work`: the host queue worker, run under Horizon's supervision.
#[derive(Debug, Clone)]
pub struct WorkCommand {
    worker: Arc<QueueWorker>,
}

impl WorkCommand {
    #[must_use]
    pub const fn new(worker: Arc<QueueWorker>) -> Self {
        Self { worker }
    }

    #[must_use]
    pub fn worker(&self) -> &QueueWorker {
        &self.worker
    }

    #[must_use]
    pub fn shares_worker(&self, worker: &Arc<QueueWorker>) -> bool {
        Arc::ptr_eq(&self.worker, worker)
    }
}
