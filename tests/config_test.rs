//! Integration tests for configuration loading

use gatemon::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[source]
url = "http://10.0.0.5:3000/gates"
timeout_ms = 1500

[poll]
interval_ms = 500

[activity]
fresh_max_secs = 0.5
recent_max_secs = 5.0
moderate_max_secs = 30.0

[metrics]
interval_secs = 5
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.source_url(), "http://10.0.0.5:3000/gates");
    assert_eq!(config.request_timeout_ms(), 1500);
    assert_eq!(config.poll_interval_ms(), 500);
    assert_eq!(config.activity_thresholds().fresh_max_secs, 0.5);
    assert_eq!(config.activity_thresholds().moderate_max_secs, 30.0);
    assert_eq!(config.metrics_interval_secs(), 5);
}

#[test]
fn test_missing_sections_use_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[poll]\ninterval_ms = 1000\n").unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.poll_interval_ms(), 1000);
    assert_eq!(config.source_url(), "http://192.168.4.1:3000/gates");
    assert_eq!(config.activity_thresholds().recent_max_secs, 10.0);
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.source_url(), "http://192.168.4.1:3000/gates");
    assert_eq!(config.poll_interval_ms(), 250);
}
