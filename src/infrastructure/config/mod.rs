use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_CONFIG_FILE: &str = "captionbridge.toml";
pub const ENV_PREFIX: &str = "CAPTIONBRIDGE_";

/// Server configuration.
///
/// Sources, later ones overriding earlier: built-in defaults, an optional
/// `captionbridge.toml`, `CAPTIONBRIDGE_*` environment variables, and finally
/// a bare `PORT` variable as set by most hosting platforms.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(length(min = 1))]
    pub model: String,
    pub api_base_url: String,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: Option<u32>,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,
    #[validate(length(min = 1))]
    pub output_language: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let llm = LLMConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            model: llm.model,
            api_base_url: llm.base_url,
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: None,
            request_timeout_secs: 120,
            max_upload_bytes: 10 * 1024 * 1024,
            output_language: "Traditional Chinese (Taiwan)".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn figment(config_file: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&["PORT"]))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment(DEFAULT_CONFIG_FILE))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        self.validate()?;
        url::Url::parse(&self.api_base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid api_base_url '{}': {}", self.api_base_url, e))
        })?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Model settings for one request, carrying the caller's credential.
    pub fn llm_config(&self, api_key: &str) -> LLMConfig {
        LLMConfig {
            base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            api_key: None,
            max_tokens: self.max_output_tokens,
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
            top_k: Some(self.top_k),
            json_output: true,
        }
        .with_api_key(api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::from_figment(AppConfig::figment(DEFAULT_CONFIG_FILE)).unwrap();
            assert_eq!(config.model, "gemini-2.0-flash-exp");
            assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
            Ok(())
        });
    }

    #[test]
    fn test_layering_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                port = 8080
                model = "from-file"
                temperature = 0.4
                "#,
            )?;
            jail.set_env("CAPTIONBRIDGE_MODEL", "from-env");

            let config = AppConfig::from_figment(AppConfig::figment(DEFAULT_CONFIG_FILE)).unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.model, "from-env");
            assert!((config.temperature - 0.4).abs() < f32::EPSILON);

            jail.set_env("PORT", "9000");
            let config = AppConfig::from_figment(AppConfig::figment(DEFAULT_CONFIG_FILE)).unwrap();
            assert_eq!(config.port, 9000);
            Ok(())
        });
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        Jail::expect_with(|jail| {
            jail.set_env("CAPTIONBRIDGE_TEMPERATURE", "3.5");
            let result = AppConfig::from_figment(AppConfig::figment(DEFAULT_CONFIG_FILE));
            assert!(matches!(result, Err(AppError::ValidationError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_rejects_bad_base_url() {
        Jail::expect_with(|jail| {
            jail.set_env("CAPTIONBRIDGE_API_BASE_URL", "not a url");
            let result = AppConfig::from_figment(AppConfig::figment(DEFAULT_CONFIG_FILE));
            assert!(matches!(result, Err(AppError::ConfigError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_llm_config_carries_key() {
        let llm = AppConfig::default().llm_config("abc");
        assert_eq!(llm.api_key.as_deref(), Some("abc"));
        assert_eq!(llm.top_k, Some(40));
        assert!(llm.json_output);
    }
}
