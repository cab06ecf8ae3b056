//! services/assistant/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `ResponseResolver` adapter answers the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolverKind {
    Rules,
    Llm,
}

impl FromStr for ResolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rules" => Ok(ResolverKind::Rules),
            "llm" => Ok(ResolverKind::Llm),
            other => Err(format!("'{}' is not one of: rules, llm", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub consent_store_path: PathBuf,
    pub auto_read_delay: Duration,
    pub resolver: ResolverKind,
    pub openai_api_key: Option<String>,
    pub llm_model: String,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- Session Settings ---
        let consent_store_path = lookup("CONSENT_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./sena-consent.json"));

        let auto_read_delay = match lookup("AUTO_READ_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidValue("AUTO_READ_DELAY_MS".to_string(), e.to_string())
            })?,
            None => Duration::from_millis(500),
        };

        // --- Resolver Settings ---
        let resolver = match lookup("RESOLVER") {
            Some(raw) => raw
                .parse::<ResolverKind>()
                .map_err(|e| ConfigError::InvalidValue("RESOLVER".to_string(), e))?,
            None => ResolverKind::Rules,
        };

        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty());
        if resolver == ResolverKind::Llm && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY".to_string()));
        }

        let llm_model = lookup("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        Ok(Self {
            bind_address,
            log_level,
            consent_store_path,
            auto_read_delay,
            resolver,
            openai_api_key,
            llm_model,
            allowed_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.consent_store_path, PathBuf::from("./sena-consent.json"));
        assert_eq!(config.auto_read_delay, Duration::from_millis(500));
        assert_eq!(config.resolver, ResolverKind::Rules);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.llm_model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_bind_address() {
        let err = config_from(&[("BIND_ADDRESS", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "BIND_ADDRESS"));
    }

    #[test]
    fn test_invalid_log_level() {
        let err = config_from(&[("RUST_LOG", "loud")]).unwrap_err();
        assert!(err.to_string().contains("'loud' is not a valid log level"));
    }

    #[test]
    fn test_invalid_auto_read_delay() {
        let err = config_from(&[("AUTO_READ_DELAY_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "AUTO_READ_DELAY_MS"));
    }

    #[test]
    fn test_llm_resolver_requires_api_key() {
        let err = config_from(&[("RESOLVER", "llm")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "OPENAI_API_KEY"));

        let config = config_from(&[("RESOLVER", "LLM"), ("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.resolver, ResolverKind::Llm);
    }

    #[test]
    fn test_unknown_resolver() {
        let err = config_from(&[("RESOLVER", "oracle")]).unwrap_err();
        assert!(err.to_string().contains("'oracle' is not one of"));
    }
}
