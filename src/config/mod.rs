mod types;

pub use types::*;

use crate::{Error, Result};
use axum::http::HeaderValue;
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = read_file(&config_path).await?;
    config.apply_env_overrides(|key| env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// Reads a YAML config file; a missing file yields the defaults.
pub async fn read_file(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    match tokio::fs::read_to_string(config_path).await {
        Ok(config_str) => from_yaml(&config_str),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration file at {}, using defaults", config_path);
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn from_yaml(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

impl Config {
    /// Applies process environment on top of the file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OPENAI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.llm.api_key = api_key;
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(Error::config(
                "LLM API key is missing; set OPENAI_API_KEY or llm.api_key",
            ));
        }

        let models = [
            ("vision_model", &self.llm.vision_model),
            ("intent_model", &self.llm.intent_model),
            ("answer_model", &self.llm.answer_model),
            ("suggestion_model", &self.llm.suggestion_model),
        ];
        for (name, model) in models {
            if model.trim().is_empty() {
                return Err(Error::config(format!("llm.{} must not be empty", name)));
            }
        }

        if self.server.cors.allowed_origins.is_empty() {
            return Err(Error::config(
                "server.cors.allowed_origins must list at least one origin",
            ));
        }
        for origin in &self.server.cors.allowed_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                return Err(Error::config(format!("Invalid CORS origin: {}", origin)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.vision_model, "gpt-4o-mini");
        assert_eq!(config.llm.answer_model, "gpt-4o");
        assert_eq!(config.llm.max_retries, 0);
        assert!(config.server.cors.allows_any_origin());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = from_yaml("llm:\n  api_key: from-file\nserver:\n  port: 9000\n").unwrap();
        config.apply_env_overrides(lookup_from(&[
            ("OPENAI_API_KEY", "from-env"),
            ("PORT", "9100"),
        ]));

        assert_eq!(config.llm.api_key, "from-env");
        assert_eq!(config.server.port, 9100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_env_key_does_not_clobber_file_key() {
        let mut config = from_yaml("llm:\n  api_key: from-file\n").unwrap();
        config.apply_env_overrides(lookup_from(&[("OPENAI_API_KEY", "  ")]));
        assert_eq!(config.llm.api_key, "from-file");
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = from_yaml("   \n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_cors_origin_rejected() {
        let mut config = Config::default();
        config.llm.api_key = "key".to_string();
        config.server.cors.allowed_origins = vec!["https://shop.example\n".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = Config::default();
        config.llm.api_key = "key".to_string();
        config.llm.intent_model = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("intent_model"));
    }
}
