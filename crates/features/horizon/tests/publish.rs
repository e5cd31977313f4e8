use hzn_horizon::HorizonServiceProvider;
use hzn_horizon::publish::{ASSETS_TAG, CONFIG_TAG, ResourcePublisher};
use hzn_kernel::RunContext;
use hzn_kernel::app::Application;
use hzn_kernel::broker::BrokerServiceProvider;
use hzn_kernel::config::ConfigStore;
use hzn_kernel::publish::PublishError;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn booted(base: &TempDir) -> Application {
    let app = Application::builder()
        .base_path(base.path())
        .context(RunContext::Console)
        .config(
            ConfigStore::from_value(json!({ "database": { "redis": { "default": { "host": "127.0.0.1" } } } }))
                .unwrap(),
        )
        .build()
        .unwrap();
    app.register(BrokerServiceProvider).unwrap();
    app.register(HorizonServiceProvider::bundled()).unwrap();
    app.boot().unwrap();
    app
}

#[test]
fn nothing_is_copied_until_asked() {
    let base = TempDir::new().unwrap();
    let _app = booted(&base);
    assert!(!base.path().join("public").exists());
    assert!(!base.path().join("config").exists());
}

#[test]
fn assets_are_copied_recursively() {
    let base = TempDir::new().unwrap();
    let app = booted(&base);

    let report = app.publisher(false).publish(ASSETS_TAG).unwrap();

    let target = base.path().join("public/vendor/horizon");
    assert!(target.join("js/app.js").is_file());
    assert!(target.join("css/app.css").is_file());
    assert!(target.join("mix-manifest.json").is_file());
    assert_eq!(report.copied.len(), 3);
    assert!(report.skipped.is_empty());
}

#[test]
fn existing_files_need_force() {
    let base = TempDir::new().unwrap();
    let app = booted(&base);
    let target = base.path().join("config/horizon.toml");

    app.publisher(false).publish(CONFIG_TAG).unwrap();
    fs::write(&target, "uri = \"edited\"\n").unwrap();

    let report = app.publisher(false).publish(CONFIG_TAG).unwrap();
    assert_eq!(report.skipped, vec![target.clone()]);
    assert_eq!(fs::read_to_string(&target).unwrap(), "uri = \"edited\"\n");

    let report = app.publisher(true).publish(CONFIG_TAG).unwrap();
    assert_eq!(report.copied, vec![target.clone()]);
    assert!(fs::read_to_string(&target).unwrap().contains("prefix = \"horizon:\""));
}

#[test]
fn single_pair_group_publishes_one_file() {
    let base = TempDir::new().unwrap();
    let app = booted(&base);
    let source = base.path().join("module/app.js");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, "console.log('hi');").unwrap();

    ResourcePublisher::new(app.publishes().clone())
        .declare_publishable("module-assets", [(source, base.path().join("public/module/app.js"))]);

    let report = app.publisher(false).publish("module-assets").unwrap();
    assert_eq!(report.copied.len(), 1);
    assert!(base.path().join("public/module/app.js").is_file());
}

#[test]
fn unknown_tag_has_no_side_effects() {
    let base = TempDir::new().unwrap();
    let app = booted(&base);
    let before: Vec<_> = fs::read_dir(base.path()).unwrap().map(|e| e.unwrap().path()).collect();

    let err = app.publisher(true).publish("nonexistent-tag").unwrap_err();

    assert!(matches!(err, PublishError::TagNotFound { .. }));
    let after: Vec<_> = fs::read_dir(base.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(before, after);
}
