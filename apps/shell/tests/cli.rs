use clap::Parser;
use hzn_shell::args::{Cli, ShellCommand};
use hzn_shell::{bootstrap, handlers};
use std::fs;
use tempfile::TempDir;

const APP_CONFIG: &str = r#"
[horizon]
uri = "queues"

[database.redis.default]
host = "127.0.0.1"
port = 6379
"#;

fn base_with_config() -> TempDir {
    let base = TempDir::new().unwrap();
    fs::create_dir_all(base.path().join("config")).unwrap();
    fs::write(base.path().join("config/app.toml"), APP_CONFIG).unwrap();
    base
}

fn cli(base: &TempDir, args: &[&str]) -> Cli {
    let base = base.path().to_str().unwrap();
    Cli::parse_from(["horizon", "--base", base].into_iter().chain(args.iter().copied()))
}

#[test]
fn parses_global_flags_after_the_subcommand() {
    let base = base_with_config();
    let cli = cli(&base, &["publish", "--tag", "horizon-assets", "--force", "--server"]);

    assert!(cli.server);
    assert!(matches!(
        cli.command,
        ShellCommand::Publish { ref tag, force: true } if tag.as_deref() == Some("horizon-assets")
    ));
}

#[test]
fn default_config_is_picked_up_from_the_base() {
    let base = base_with_config();
    let app = bootstrap(&cli(&base, &["status"])).unwrap();

    assert_eq!(handlers::config(&app, "horizon.uri").unwrap(), "\"queues\"\n");
    assert!(handlers::routes(&app).contains("/queues/api/stats"));
    assert!(handlers::status(&app).contains("providers: queue, broker, horizon"));
}

#[test]
fn server_context_lists_only_the_snapshot_command() {
    let base = base_with_config();
    let app = bootstrap(&cli(&base, &["--server", "commands"])).unwrap();
    assert_eq!(handlers::commands(&app), "horizon:snapshot\n");
}

#[test]
fn events_are_listed_with_listeners() {
    let base = base_with_config();
    let app = bootstrap(&cli(&base, &["events"])).unwrap();
    let out = handlers::events(&app);

    assert!(out.contains("horizon.job_pushed\n  -> store_job\n  -> store_monitored_tags\n"));
}

#[test]
fn publish_copies_into_the_base() {
    let base = base_with_config();
    let app = bootstrap(&cli(&base, &["publish"])).unwrap();

    let out = handlers::publish(&app, Some("horizon-config"), false).unwrap();
    assert!(out.contains("Copied"));
    assert!(base.path().join("config/horizon.toml").is_file());

    assert!(handlers::publish(&app, Some("nonexistent-tag"), false).is_err());
}

#[test]
fn missing_broker_configuration_fails_the_boot() {
    let base = TempDir::new().unwrap();
    let err = bootstrap(&cli(&base, &["status"])).unwrap_err();
    assert!(format!("{err:#}").contains("horizon"));
}
