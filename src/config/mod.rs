//! Main configuration module.
//!
//! Re-exports submodules for game, question source and server configuration,
//! and reads the runtime `Settings` from the environment.
pub mod game;
pub mod question_source;
pub mod server;

use std::env;

use thiserror::Error;

/// Errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },
}

/// Runtime settings, read once at boot.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Key for the generative-language API. `None` keeps the server up but
    /// every setup request fails with a configuration error.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub bind_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { name: "PORT", value })?,
            None => server::DEFAULT_PORT,
        };

        let allowed_origins = match non_empty("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => server::DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Settings {
            api_key: non_empty("GEMINI_API_KEY"),
            api_base: non_empty("GEMINI_API_BASE")
                .unwrap_or_else(|| question_source::DEFAULT_API_BASE.to_string()),
            model: non_empty("GEMINI_MODEL")
                .unwrap_or_else(|| question_source::DEFAULT_MODEL.to_string()),
            bind_host: non_empty("BIND_HOST")
                .unwrap_or_else(|| server::DEFAULT_BIND_HOST.to_string()),
            port,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.port, server::DEFAULT_PORT);
        assert_eq!(settings.model, question_source::DEFAULT_MODEL);
        assert_eq!(settings.allowed_origins, vec!["http://localhost:5173".to_string()]);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_origins_list_is_split_and_trimmed() {
        let settings = Settings::from_lookup(lookup(&[(
            "ALLOWED_ORIGINS",
            "http://a.test, https://b.test ,",
        )]))
        .unwrap();
        assert_eq!(settings.allowed_origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }
}
