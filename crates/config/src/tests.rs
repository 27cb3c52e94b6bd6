use crate::{AppConfig, LlmConfig};
use figment::{
    Figment,
    providers::{Format, Toml},
};
use secrecy::{ExposeSecret, Secret};

fn from_toml(toml: &str) -> AppConfig {
    AppConfig::from_figment(Figment::new().merge(Toml::string(toml))).unwrap()
}

#[test]
fn test_secret_redaction() {
    let secret = Secret::new("my_secret_key".to_string());
    let debug_output = format!("{:?}", secret);
    assert!(debug_output.contains("Secret([REDACTED"));
    assert!(!debug_output.contains("my_secret_key"));
}

#[test]
fn test_llm_config_redaction() {
    let config = LlmConfig {
        api_key: Some(Secret::new("AIza-test-key".to_string())),
        ..LlmConfig::default()
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("AIza-test-key"));
    assert!(debug_output.contains("gemini-2.0-flash"));
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = from_toml(r#"app_name = "margin-api""#);

    assert_eq!(config.app_name, "margin-api");
    assert!(config.is_development());
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.telemetry.log_level, "info");
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.llm.timeout_secs, 30);
    assert!(config.data.products_file.is_none());
}

#[test]
fn test_later_layers_override_earlier() {
    let figment = Figment::new()
        .merge(Toml::string(
            r#"
            app_name = "margin-api"
            [server]
            host = "127.0.0.1"
            port = 5000
            "#,
        ))
        .merge(Toml::string(
            r#"
            app_env = "production"
            [server]
            port = 8080
            [llm]
            api_key = "k-123"
            "#,
        ));
    let config = AppConfig::from_figment(figment).unwrap();

    assert!(config.is_production());
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(
        config.llm.api_key.as_ref().map(|k| k.expose_secret().as_str()),
        Some("k-123")
    );
}

#[test]
fn test_missing_app_name_is_error() {
    let result = AppConfig::from_figment(Figment::new().merge(Toml::string("[server]\nport = 1")));
    assert!(result.is_err());
}
