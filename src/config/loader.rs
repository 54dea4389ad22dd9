//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AppConfig, FailurePolicy};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply process
/// environment overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Deserialize a TOML document into a configuration.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Apply `PORT`, `LOG_LEVEL` and `DATABASE_ON_FAILURE` from `lookup`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "PORT",
            message: format!("'{}' is not a port number", port),
        })?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    if let Some(policy) = lookup("DATABASE_ON_FAILURE") {
        config.database.on_failure = policy
            .parse::<FailurePolicy>()
            .map_err(|message| ConfigError::Env {
                var: "DATABASE_ON_FAILURE",
                message,
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let config = parse_config(
            r#"
            [database]
            uri = "memory://"
            on_failure = "fail_fast"

            [http]
            cors_allow_origins = ["https://ij.dev"]
            "#,
        )
        .unwrap();

        assert_eq!(config.database.uri.as_deref(), Some("memory://"));
        assert_eq!(config.database.on_failure, FailurePolicy::FailFast);
        assert_eq!(config.database.uri_env, "MONGODB_URI");
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(config.http.cors_allow_origins, vec!["https://ij.dev"]);
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        let result = parse_config("[database]\non_failure = \"explode\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "127.0.0.1:5000".into();
        apply_env_overrides(&mut config, env(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "PORT", .. }));
    }

    #[test]
    fn test_policy_and_log_level_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("DATABASE_ON_FAILURE", "fail-fast"), ("LOG_LEVEL", "debug")]),
        )
        .unwrap();
        assert_eq!(config.database.on_failure, FailurePolicy::FailFast);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.toml");
        fs::write(&path, "[http]\nrequest_timeout_secs = 5\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.http.request_timeout_secs, 5);
    }

    #[test]
    fn test_load_config_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.toml");
        fs::write(&path, "[http]\nbody_limit_bytes = 0\n").unwrap();

        match load_config(Some(&path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors[0].field, "http.body_limit_bytes");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
