use hzn_kernel::RunContext;
use hzn_kernel::app::Application;
use hzn_kernel::broker::{BrokerManager, BrokerServiceProvider};
use hzn_kernel::config::ConfigStore;
use hzn_kernel::keys;
use hzn_kernel::queue::{QueueManager, QueueServiceProvider, QueueWorker};
use serde_json::json;
use std::sync::Arc;

fn host(config: serde_json::Value) -> Application {
    let app = Application::builder()
        .base_path("/srv/app")
        .context(RunContext::Server)
        .config(ConfigStore::from_value(config).unwrap())
        .build()
        .unwrap();
    app.register(QueueServiceProvider).unwrap();
    app.register(BrokerServiceProvider).unwrap();
    app
}

#[test]
fn core_providers_bind_lazily() {
    let app = host(json!({}));
    app.boot().unwrap();

    assert!(app.container().bound(keys::QUEUE));
    assert!(app.container().bound(keys::BROKER));
    assert!(!app.container().resolved(keys::BROKER), "nothing resolves the broker during boot");
}

#[test]
fn worker_shares_the_queue_manager() {
    let app = host(json!({}));
    let manager = app.container().resolve::<QueueManager>(keys::QUEUE).unwrap();
    let worker = app.container().resolve::<QueueWorker>(keys::QUEUE_WORKER).unwrap();

    assert!(std::ptr::eq(worker.manager(), Arc::as_ptr(&manager)));
}

#[test]
fn broker_reads_live_configuration() {
    let app = host(json!({ "database": { "redis": { "default": { "host": "redis.internal" } } } }));
    app.config().set("database.redis.default.port", 6380);

    let broker = app.container().resolve::<BrokerManager>(keys::BROKER).unwrap();
    assert_eq!(broker.connection("default").unwrap().url(), "redis://redis.internal:6380/0");
}

#[test]
fn broker_without_configuration_fails_to_resolve() {
    let app = host(json!({}));
    let err = app.container().resolve::<BrokerManager>(keys::BROKER).unwrap_err();
    assert_eq!(err.kind(), "Resolution");
}
