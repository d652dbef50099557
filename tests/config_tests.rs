// Config loading and validation tests

use awspulse::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[metrics]
window_minutes = 30
delay_minutes = 2
bucket_width_minutes = 10

[cache]
max_age_secs = 30

[chat]
model_id = "anthropic.claude-3-5-sonnet-20241022-v2:0"
prompt_dir = "prompts"
max_tokens = 200
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.metrics.window_minutes, 30);
    assert_eq!(config.metrics.delay_minutes, 2);
    assert_eq!(config.metrics.bucket_width_minutes, 10);
    assert_eq!(config.cache.max_age_secs, 30);
    assert_eq!(config.chat.prompt_dir, "prompts");
    assert_eq!(config.chat.max_tokens, 200);
}

#[test]
fn test_config_metrics_and_cache_default_when_omitted() {
    let minimal = r#"
[server]
port = 8081
host = "0.0.0.0"

[chat]
model_id = "anthropic.claude-3-5-sonnet-20241022-v2:0"
prompt_dir = "prompts"
"#;
    let config = AppConfig::load_from_str(minimal).expect("minimal config");
    assert_eq!(config.metrics.window_minutes, 30);
    assert_eq!(config.metrics.delay_minutes, 2);
    assert_eq!(config.metrics.bucket_width_minutes, 10);
    assert_eq!(config.cache.max_age_secs, 30);
    assert_eq!(config.chat.max_tokens, 200);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8081", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_zero_window() {
    let bad = VALID_CONFIG.replace("window_minutes = 30", "window_minutes = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("window_minutes"));
}

#[test]
fn test_config_validation_rejects_zero_bucket_width() {
    let bad = VALID_CONFIG.replace("bucket_width_minutes = 10", "bucket_width_minutes = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("bucket_width_minutes"));
}

#[test]
fn test_config_validation_rejects_out_of_range_max_age() {
    let bad = VALID_CONFIG.replace("max_age_secs = 30", "max_age_secs = 5");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_age_secs"));

    let bad = VALID_CONFIG.replace("max_age_secs = 30", "max_age_secs = 120");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_age_secs"));
}

#[test]
fn test_config_validation_rejects_empty_model_id() {
    let bad = VALID_CONFIG.replace(
        "model_id = \"anthropic.claude-3-5-sonnet-20241022-v2:0\"",
        "model_id = \"\"",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("model_id"));
}

#[test]
fn test_config_validation_rejects_empty_prompt_dir() {
    let bad = VALID_CONFIG.replace("prompt_dir = \"prompts\"", "prompt_dir = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("prompt_dir"));
}

#[test]
fn test_config_validation_rejects_zero_max_tokens() {
    let bad = VALID_CONFIG.replace("max_tokens = 200", "max_tokens = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_tokens"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.metrics.window_minutes, 30);
}
