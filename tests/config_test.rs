use std::collections::HashMap;
use std::path::PathBuf;

use reward_tracker::auth::CallerId;
use reward_tracker::config::{Config, DEFAULT_PORT, DEFAULT_TELEGRAM_API_URL};
use secrecy::ExposeSecret;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn config_loads_required_fields_with_defaults() {
    let config = Config::from_lookup(lookup(&[("BOT_TOKEN", "123:abc"), ("ADMIN_ID", "42")])).unwrap();

    assert_eq!(config.bot_token.expose_secret(), "123:abc");
    assert_eq!(config.admin_id, CallerId(42));
    assert_eq!(config.data_file, PathBuf::from("data.json"));
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
    assert_eq!(config.log_level, "info");
    assert!(config.otel_endpoint.is_none());
}

#[test]
fn config_reads_optional_overrides() {
    let config = Config::from_lookup(lookup(&[
        ("BOT_TOKEN", "t"),
        ("ADMIN_ID", "-100"),
        ("DATA_FILE", "/var/lib/tracker/ledger.json"),
        ("PORT", "10000"),
        ("TELEGRAM_API_URL", "http://localhost:8081/"),
        ("POLL_TIMEOUT_SECS", "5"),
        ("LOG_LEVEL", "debug"),
    ]))
    .unwrap();

    assert_eq!(config.admin_id, CallerId(-100));
    assert_eq!(config.data_file, PathBuf::from("/var/lib/tracker/ledger.json"));
    assert_eq!(config.port, 10000);
    assert_eq!(config.telegram_api_url, "http://localhost:8081");
    assert_eq!(config.poll_timeout_secs, 5);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn config_fails_without_bot_token() {
    let result = Config::from_lookup(lookup(&[("ADMIN_ID", "42")]));
    assert!(result.is_err());
}

#[test]
fn config_fails_without_admin_id() {
    let result = Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "  ")]));
    assert!(result.is_err());
}

#[test]
fn config_rejects_non_numeric_admin_id() {
    let result = Config::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "alice")]));
    assert!(result.is_err());
}

#[test]
fn config_debug_does_not_print_token() {
    let config = Config::from_lookup(lookup(&[("BOT_TOKEN", "super-secret"), ("ADMIN_ID", "1")])).unwrap();
    assert!(!format!("{config:?}").contains("super-secret"));
}
