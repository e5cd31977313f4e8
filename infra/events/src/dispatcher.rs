use crate::error::EventError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Handles an event on behalf of a listener id.
///
/// Implemented for any `Fn(&str, &dyn Any) -> Result<(), EventError>`.
pub trait Listener: Send + Sync {
    /// # Errors
    /// Returns [`EventError::Listener`] to abort the rest of the dispatch.
    fn handle(&self, event: &str, payload: &dyn Any) -> Result<(), EventError>;
}

impl<F> Listener for F
where
    F: Fn(&str, &dyn Any) -> Result<(), EventError> + Send + Sync,
{
    fn handle(&self, event: &str, payload: &dyn Any) -> Result<(), EventError> {
        self(event, payload)
    }
}

#[derive(Default)]
struct Registry {
    /// Event name -> listener ids, in attach order.
    listeners: FxHashMap<String, Vec<String>>,
    /// Listener id -> handler.
    handlers: FxHashMap<String, Arc<dyn Listener>>,
}

/// The host event dispatcher.
#[derive(Clone, Default)]
pub struct Dispatcher {
    inner: Arc<RwLock<Registry>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.read();
        f.debug_struct("Dispatcher")
            .field("events", &registry.listeners.len())
            .field("handlers", &registry.handlers.len())
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener` to the list for `event`.
    pub fn listen(&self, event: impl Into<String>, listener: impl Into<String>) {
        let (event, listener) = (event.into(), listener.into());
        debug!(event = %event, listener = %listener, "Listener attached");
        self.inner.write().listeners.entry(event).or_default().push(listener);
    }

    /// Supplies the handler that runs whenever `listener` is dispatched.
    ///
    /// A later subscription for the same id replaces the earlier one.
    pub fn subscribe(&self, listener: impl Into<String>, handler: impl Listener + 'static) {
        self.inner.write().handlers.insert(listener.into(), Arc::new(handler));
    }

    /// Listener ids attached to `event`, in dispatch order.
    #[must_use]
    pub fn listeners(&self, event: &str) -> Vec<String> {
        self.inner.read().listeners.get(event).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn has_listeners(&self, event: &str) -> bool {
        self.inner.read().listeners.get(event).is_some_and(|l| !l.is_empty())
    }

    /// Event names with at least one listener, sorted.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.inner.read().listeners.keys().cloned().collect();
        events.sort_unstable();
        events
    }

    /// Total number of attachments across all events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().listeners.values().map(Vec::len).sum()
    }

    /// Detaches every listener of `event`, returning how many were removed.
    pub fn forget(&self, event: &str) -> usize {
        self.inner.write().listeners.remove(event).map_or(0, |l| l.len())
    }

    /// Runs the listeners of `event` in order.
    ///
    /// The lock is released before handlers run, so a handler may attach or
    /// dispatch further events.
    ///
    /// # Errors
    /// Returns [`EventError::UnresolvedListener`] when a listener id has no handler and
    /// [`EventError::Listener`] when a handler fails. Listeners after the failing one are skipped.
    pub fn dispatch(&self, event: &str, payload: &dyn Any) -> Result<usize, EventError> {
        let plan: Vec<(String, Option<Arc<dyn Listener>>)> = {
            let registry = self.inner.read();
            let Some(listeners) = registry.listeners.get(event) else {
                trace!(event, "Event dropped: no listeners");
                return Ok(0);
            };
            listeners.iter().map(|id| (id.clone(), registry.handlers.get(id).cloned())).collect()
        };

        for (id, handler) in &plan {
            let handler = handler.as_ref().ok_or_else(|| EventError::UnresolvedListener {
                message: id.clone().into(),
                context: Some(format!("dispatching {event}").into()),
            })?;
            trace!(event, listener = %id, "Running listener");
            handler.handle(event, payload)?;
        }

        trace!(event, count = plan.len(), "Event dispatched");
        Ok(plan.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_preserves_attach_order() {
        let events = Dispatcher::new();
        events.listen("job_pushed", "store_job");
        events.listen("job_pushed", "store_tags");

        assert_eq!(events.listeners("job_pushed"), vec!["store_job", "store_tags"]);
        assert!(events.has_listeners("job_pushed"));
        assert!(!events.has_listeners("job_failed"));
    }

    #[test]
    fn listen_twice_attaches_twice() {
        let events = Dispatcher::new();
        events.listen("job_pushed", "store_job");
        events.listen("job_pushed", "store_job");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn forget_removes_an_event() {
        let events = Dispatcher::new();
        events.listen("a", "x");
        events.listen("a", "y");
        events.listen("b", "z");

        assert_eq!(events.forget("a"), 2);
        assert_eq!(events.forget("a"), 0);
        assert_eq!(events.events(), vec!["b"]);
    }
}
