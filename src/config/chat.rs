//! Chat completion provider configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;
use super::is_http_url;
use crate::ports::GenerationParams;

/// Chat completion configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Full chat completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Vendor API key; when absent the login token is sent instead
    pub api_key: Option<Secret<String>>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional system message sent first
    pub system_prompt: Option<String>,

    /// Send earlier messages of the conversation with each request
    #[serde(default = "default_include_history")]
    pub include_history: bool,

    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub max_tokens: Option<u32>,
    pub frequency_penalty: Option<f32>,
}

impl ChatConfig {
    /// Generation parameters forwarded with every request
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_tokens: self.max_tokens,
            frequency_penalty: self.frequency_penalty,
            ..Default::default()
        }
    }

    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.endpoint) {
            return Err(ValidationError::InvalidUrl {
                field: "chat.endpoint",
            });
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("chat.model"));
        }

        check_range("temperature", self.temperature, 0.0, 2.0)?;
        check_range("top_p", self.top_p, 0.0, 1.0)?;
        check_range("frequency_penalty", self.frequency_penalty, -2.0, 2.0)?;
        if self.max_tokens == Some(0) {
            return Err(ValidationError::ParameterOutOfRange {
                name: "max_tokens",
                value: 0.0,
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            system_prompt: None,
            include_history: default_include_history(),
            temperature: None,
            top_p: None,
            top_k: None,
            max_tokens: None,
            frequency_penalty: None,
        }
    }
}

fn check_range(
    name: &'static str,
    value: Option<f32>,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    match value.map(f64::from) {
        Some(v) if !(min..=max).contains(&v) => Err(ValidationError::ParameterOutOfRange {
            name,
            value: v,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

fn default_endpoint() -> String {
    "https://api.siliconflow.cn/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "Qwen/Qwen2.5-7B-Instruct".to_string()
}

fn default_include_history() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.endpoint, "https://api.siliconflow.cn/v1/chat/completions");
        assert_eq!(config.model, "Qwen/Qwen2.5-7B-Instruct");
        assert!(config.include_history);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generation_params_copy_configured_values() {
        let config = ChatConfig {
            temperature: Some(0.7),
            max_tokens: Some(512),
            ..Default::default()
        };
        let params = config.generation_params();
        assert_eq!(params.temperature, Some(0.7));
        assert_eq!(params.max_tokens, Some(512));
        assert_eq!(params.top_p, None);
        assert!(params.extra.is_empty());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let config = ChatConfig {
            temperature: Some(3.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ParameterOutOfRange { name: "temperature", .. })
        ));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let config = ChatConfig {
            max_tokens: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let config = ChatConfig {
            endpoint: "siliconflow".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl { field: "chat.endpoint" })
        ));
    }
}
