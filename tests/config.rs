use cryptodash::{Config, DashboardError, LogFormat};
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_overrides_defaults() {
    let file = write_config(
        r#"
api_base_url = "http://localhost:8080/api/v3"
vs_currency = "eur"
per_page = 50
debounce_ms = 150
request_timeout_ms = 2000
log_format = "json"
log_file = "-"
"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.api_base_url, "http://localhost:8080/api/v3");
    assert_eq!(config.vs_currency, "eur");
    assert_eq!(config.per_page, 50);
    assert_eq!(config.page, 1);
    assert_eq!(config.debounce(), Duration::from_millis(150));
    assert_eq!(config.request_timeout_ms, Some(2000));
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.log_file.as_deref(), Some("-"));
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = write_config("");
    assert_eq!(Config::from_file(file.path()).unwrap(), Config::default());
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("per_page = \"many\"\n");

    let err = Config::from_file(file.path()).unwrap_err();

    assert!(matches!(err, DashboardError::Config(_)));
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();

    assert!(matches!(err, DashboardError::Config(msg) if msg.contains("absent.toml")));
}

#[test]
fn test_string_overrides_apply_on_top_of_file() {
    let file = write_config("vs_currency = \"eur\"\nper_page = 50\n");
    let mut config = Config::from_file(file.path()).unwrap();

    let overrides: BTreeMap<String, String> = [("per_page", "10"), ("page", "two")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let rejected = config.apply_map(&overrides);

    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].key, "page");
    assert_eq!(rejected[0].value, "two");
    assert_eq!(config.vs_currency, "eur");
    assert_eq!(config.per_page, 10);
    assert_eq!(config.page, 1);

    let query = config.market_query();
    assert_eq!(query.vs_currency, "eur");
    assert_eq!(query.per_page, 10);
}
