use hzn_domain::config::{Balance, HorizonConfig, TrimConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let cfg = HorizonConfig::default();
    assert_eq!(cfg.uri, "horizon");
    assert_eq!(cfg.use_connection, "default");
    assert_eq!(cfg.middleware, vec!["web".to_owned()]);
    assert_eq!(cfg.waits.get("redis:default"), Some(&60));
    assert!(cfg.environments.is_empty());

    let trim = TrimConfig::default();
    assert_eq!(trim.recent, 60);
    assert_eq!(trim.failed, 10_080);
}

#[test]
fn horizon_config_deserializes() {
    let raw = json!({
        "uri": "jobs",
        "use": "redis",
        "middleware": ["auth"],
        "environments": {
            "production": {
                "supervisor-1": { "queue": ["default", "mail"], "balance": "auto", "processes": 10, "tries": 3 }
            }
        }
    });

    let cfg: HorizonConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.uri, "jobs");
    assert_eq!(cfg.use_connection, "redis");
    assert_eq!(cfg.prefix, "horizon:", "missing keys fall back to defaults");

    let supervisors = cfg.supervisors("production").expect("production supervisors");
    let first = &supervisors["supervisor-1"];
    assert_eq!(first.balance, Balance::Auto);
    assert_eq!(first.processes, 10);
    assert_eq!(first.connection, "redis");
    assert!(cfg.supervisors("staging").is_none());
}

#[test]
fn wrong_value_types_are_rejected() {
    let raw = json!({ "middleware": "web" });
    assert!(serde_json::from_value::<HorizonConfig>(raw).is_err());
}
