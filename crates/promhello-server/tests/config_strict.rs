#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use promhello_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
app:
  listen: "0.0.0.0:5000"
  lisen: "0.0.0.0:5001" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config_uses_default_ports() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.app_addr().unwrap().port(), 5000);
    assert_eq!(cfg.metrics_addr().unwrap().port(), 8000);
    assert_eq!(cfg.shutdown.drain_grace_ms, 1000);
}

#[test]
fn explicit_listeners_are_parsed() {
    let ok = r#"
version: 1
app:
  listen: "127.0.0.1:15000"
metrics:
  listen: "127.0.0.1:18000"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.app_addr().unwrap().to_string(), "127.0.0.1:15000");
    assert_eq!(cfg.metrics_addr().unwrap().to_string(), "127.0.0.1:18000");
}

#[test]
fn unsupported_version_is_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn shared_listen_address_is_rejected() {
    let bad = r#"
version: 1
app:
  listen: "0.0.0.0:9000"
metrics:
  listen: "0.0.0.0:9000"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn unparsable_listen_address_is_rejected() {
    let bad = r#"
version: 1
metrics:
  listen: "localhost-ish"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("metrics.listen"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("promhello-no-such-config.yaml");
    let cfg = config::load_or_default(&path).expect("defaults");
    assert_eq!(cfg.app_addr().unwrap().port(), 5000);

    let err = config::load_from_file(&path).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}

#[test]
fn drain_grace_is_bounded() {
    let ok = config::load_from_str("version: 1\nshutdown:\n  drain_grace_ms: 0\n")
        .expect("must parse");
    assert!(ok.shutdown.drain_grace().is_zero());

    let err = config::load_from_str("version: 1\nshutdown:\n  drain_grace_ms: 600000\n")
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    assert!(err.to_string().contains("drain_grace_ms"));
}
