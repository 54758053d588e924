use std::collections::HashMap;

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(None, env_from(&[])).expect("settings");
    assert_eq!(settings.api_base.as_str(), DEFAULT_API_BASE);
    assert_eq!(settings.request_timeout_secs, None);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
        api_base = "https://loterias.example.com/api/"
        request_timeout_secs = 15
        log_filter = "client_core=debug"
    "#;
    let settings = load_settings_from(Some(file), env_from(&[])).expect("settings");
    assert_eq!(settings.api_base.as_str(), "https://loterias.example.com/api");
    assert_eq!(settings.request_timeout_secs, Some(15));
    assert_eq!(settings.log_filter, "client_core=debug");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let file = r#"api_base = "http://from-file:5058/api""#;
    let settings = load_settings_from(
        Some(file),
        env_from(&[
            ("TIMEMANIA_API_BASE", "http://from-legacy-env:5058/api"),
            ("APP__API_BASE", "http://from-app-env:5058/api"),
            ("APP__REQUEST_TIMEOUT_SECS", " 30 "),
            ("APP__LOG_FILTER", "warn"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.api_base.as_str(), "http://from-app-env:5058/api");
    assert_eq!(settings.request_timeout_secs, Some(30));
    assert_eq!(settings.log_filter, "warn");

    let settings = load_settings_from(
        Some(file),
        env_from(&[("TIMEMANIA_API_BASE", "http://from-legacy-env:5058/api")]),
    )
    .expect("settings");
    assert_eq!(settings.api_base.as_str(), "http://from-legacy-env:5058/api");
}

#[test]
fn zero_timeout_and_blank_filter_mean_unset() {
    let settings = load_settings_from(
        Some("request_timeout_secs = 0\nlog_filter = \"  \""),
        env_from(&[]),
    )
    .expect("settings");
    assert_eq!(settings.request_timeout_secs, None);
    assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(load_settings_from(Some("api_base = 5"), env_from(&[])).is_err());
    assert!(load_settings_from(Some("unknown_key = \"x\""), env_from(&[])).is_err());
    assert!(
        load_settings_from(None, env_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")])).is_err()
    );
    assert!(load_settings_from(None, env_from(&[("APP__API_BASE", "not a url")])).is_err());
    assert!(parse_api_base("ftp://example.com/api").is_err());
}

#[test]
fn missing_config_file_is_not_an_error() {
    let path = std::env::temp_dir().join("timemania_console_missing_config.toml");
    let _ = fs::remove_file(&path);
    assert!(load_settings(&path).is_ok());
}
