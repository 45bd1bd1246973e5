use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "tracker.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Supabase,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_store_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_base_url")]
    pub base_url: String,
    #[serde(default = "default_model_name")]
    pub default_model: String,
    #[serde(default = "default_available_models")]
    pub available_models: Vec<String>,
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_store_timeout() -> u64 {
    30
}

fn default_model_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_name() -> String {
    "mistral".to_string()
}

fn default_available_models() -> Vec<String> {
    vec!["mistral".to_string(), "llama3".to_string()]
}

fn default_model_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            api_key: String::new(),
            timeout_seconds: default_store_timeout(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_model_base_url(),
            default_model: default_model_name(),
            available_models: default_available_models(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Load configuration from the given file (optional), `LLM_TRACKER__*`
/// variables and the plain `SUPABASE_URL` / `SUPABASE_KEY` / `OLLAMA_MODEL`
/// variables, in increasing precedence.
pub fn load_config(path: &Path) -> Result<Config, AppError> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("LLM_TRACKER").separator("__"))
        .set_override_option("store.url", non_empty_env("SUPABASE_URL"))
        .and_then(|b| b.set_override_option("store.api_key", non_empty_env("SUPABASE_KEY")))
        .and_then(|b| b.set_override_option("model.default_model", non_empty_env("OLLAMA_MODEL")))
        .and_then(|b| b.build())
        .map_err(|e| AppError::ConfigError(e.to_string()))?;

    let mut cfg: Config = config
        .try_deserialize()
        .map_err(|e| AppError::ConfigError(e.to_string()))?;
    validate_config(&mut cfg)?;

    Ok(cfg)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn validate_config(cfg: &mut Config) -> Result<(), AppError> {
    if cfg.store.backend == StoreBackend::Supabase {
        if cfg.store.url.trim().is_empty() {
            return Err(AppError::ConfigError(
                "store.url is empty (set SUPABASE_URL)".to_string(),
            ));
        }
        if cfg.store.api_key.trim().is_empty() {
            return Err(AppError::ConfigError(
                "store.api_key is empty (set SUPABASE_KEY)".to_string(),
            ));
        }
    }

    if cfg.model.default_model.trim().is_empty() {
        return Err(AppError::ConfigError(
            "model.default_model cannot be empty".to_string(),
        ));
    }

    // An explicitly chosen model is always selectable
    if !cfg.model.available_models.contains(&cfg.model.default_model) {
        cfg.model
            .available_models
            .insert(0, cfg.model.default_model.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_requires_store_url() {
        let mut cfg = create_test_config();
        cfg.store.url.clear();

        let result = validate_config(&mut cfg);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("store.url is empty"));
    }

    #[test]
    fn test_validate_config_requires_api_key() {
        let mut cfg = create_test_config();
        cfg.store.api_key = "   ".to_string();

        let result = validate_config(&mut cfg);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_memory_backend_needs_no_credentials() {
        let mut cfg = create_test_config();
        cfg.store.backend = StoreBackend::Memory;
        cfg.store.url.clear();
        cfg.store.api_key.clear();

        assert!(validate_config(&mut cfg).is_ok());
    }

    #[test]
    fn test_default_model_is_made_available() {
        let mut cfg = create_test_config();
        cfg.model.default_model = "phi3".to_string();

        validate_config(&mut cfg).unwrap();
        assert_eq!(cfg.model.available_models[0], "phi3");
        assert_eq!(cfg.model.available_models.len(), 3);
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.store.backend, StoreBackend::Supabase);
        assert_eq!(cfg.model.base_url, "http://localhost:11434");
        assert_eq!(cfg.model.default_model, "mistral");
        assert_eq!(cfg.model.available_models, vec!["mistral", "llama3"]);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [store]
            backend = "memory"

            [model]
            default_model = "llama3"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.store.timeout_seconds, 30);
        assert_eq!(cfg.model.default_model, "llama3");
        assert_eq!(cfg.model.timeout_seconds, 600);
    }

    fn create_test_config() -> Config {
        Config {
            store: StoreConfig {
                backend: StoreBackend::Supabase,
                url: "https://example.supabase.co".to_string(),
                api_key: "sb_secret_test".to_string(),
                timeout_seconds: 30,
            },
            model: ModelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
