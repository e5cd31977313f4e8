use hzn_events::{Dispatcher, EventError};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

fn recorder(log: Arc<Mutex<Vec<String>>>, name: &'static str) -> impl hzn_events::Listener {
    move |event: &str, _payload: &dyn Any| -> Result<(), EventError> {
        log.lock().push(format!("{event}:{name}"));
        Ok(())
    }
}

#[test]
fn dispatch_runs_listeners_in_attach_order() {
    let events = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    events.listen("job_deleted", "mark_complete");
    events.listen("job_deleted", "update_metrics");
    events.subscribe("mark_complete", recorder(Arc::clone(&log), "mark_complete"));
    events.subscribe("update_metrics", recorder(Arc::clone(&log), "update_metrics"));

    let ran = events.dispatch("job_deleted", &()).unwrap();

    assert_eq!(ran, 2);
    assert_eq!(*log.lock(), vec!["job_deleted:mark_complete", "job_deleted:update_metrics"]);
}

#[test]
fn dispatch_without_listeners_is_a_noop() {
    let events = Dispatcher::new();
    assert_eq!(events.dispatch("nothing", &()).unwrap(), 0);
}

#[test]
fn unresolved_listener_aborts_dispatch() {
    let events = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    events.listen("job_failed", "known");
    events.listen("job_failed", "unknown");
    events.listen("job_failed", "after");
    events.subscribe("known", recorder(Arc::clone(&log), "known"));
    events.subscribe("after", recorder(Arc::clone(&log), "after"));

    let err = events.dispatch("job_failed", &()).unwrap_err();

    assert!(matches!(err, EventError::UnresolvedListener { .. }));
    assert_eq!(*log.lock(), vec!["job_failed:known"], "listeners after the failure are skipped");
}

#[test]
fn handlers_receive_the_payload() {
    let events = Dispatcher::new();
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);

    events.listen("job_pushed", "capture");
    events.subscribe("capture", move |_event: &str, payload: &dyn Any| -> Result<(), EventError> {
        *sink.lock() = payload.downcast_ref::<u64>().copied();
        Ok(())
    });

    events.dispatch("job_pushed", &42_u64).unwrap();
    assert_eq!(*seen.lock(), Some(42));
}

#[test]
fn handlers_may_attach_listeners_while_dispatching() {
    let events = Dispatcher::new();
    let nested = events.clone();

    events.listen("boot", "late_binder");
    events.subscribe("late_binder", move |_event: &str, _payload: &dyn Any| -> Result<(), EventError> {
        nested.listen("later", "someone");
        Ok(())
    });

    events.dispatch("boot", &()).unwrap();
    assert_eq!(events.listeners("later"), vec!["someone"]);
}

#[test]
fn failing_handler_propagates() {
    let events = Dispatcher::new();
    events.listen("job_pushed", "broken");
    events.subscribe("broken", |_event: &str, _payload: &dyn Any| -> Result<(), EventError> {
        Err(EventError::Listener { message: "store unavailable".into(), context: None })
    });

    let err = events.dispatch("job_pushed", &()).unwrap_err();
    assert_eq!(err.kind(), "Listener");
}
