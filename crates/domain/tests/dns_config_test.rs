use ferrous_q_domain::config::{CliOverrides, Config, ConfigError};
use std::io::Write;

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert!(config.query.server.is_none());
    assert!(config.query.odoh_proxy.is_none());
    assert!(!config.query.insecure);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_config_from_toml() {
    let config = Config::from_toml(
        r#"
        [query]
        server = "tls://dns.quad9.net"
        odoh_proxy = "https://odoh-proxy.example/proxy"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.query.server.as_deref(), Some("tls://dns.quad9.net"));
    assert_eq!(
        config.query.odoh_proxy.as_deref(),
        Some("https://odoh-proxy.example/proxy")
    );
    assert!(!config.query.insecure);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_missing_sections_use_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_parse_error() {
    let result = Config::from_toml("[query\nserver = ");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_from_explicit_path_with_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[query]\nserver = \"9.9.9.9\"\ninsecure = false").unwrap();

    let overrides = CliOverrides {
        server: Some("1.1.1.1".to_string()),
        insecure: true,
        ..CliOverrides::default()
    };
    let config = Config::load(file.path().to_str(), overrides).unwrap();

    assert_eq!(config.query.server.as_deref(), Some("1.1.1.1"));
    assert!(config.query.insecure);
}

#[test]
fn test_load_missing_explicit_path_fails() {
    let result = Config::load(Some("/nonexistent/ferrous-q.toml"), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileRead(_, _))));
}

#[test]
fn test_validate_rejects_unknown_log_level() {
    let mut config = Config::default();
    config.logging.level = "loud".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    config.logging.level = "DEBUG".to_string();
    assert!(config.validate().is_ok());
}
