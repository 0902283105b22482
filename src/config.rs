use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Sampling parameters sent with every completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

/// OAuth credentials for the Gmail API. All three secrets plus the sender are required.
#[derive(Clone, Debug)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    pub sender: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation: GenerationConfig,
    pub llm_timeout_seconds: u64,
    pub max_request_bytes: usize,
    pub cors_allowed_origin: Option<String>,
    pub gmail: Option<GmailCredentials>,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = GenerationConfig::default();

        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parse_env("WEB_SERVER_PORT").unwrap_or(8080),
            gemini_api_key: SecretString::from(env::var("GEMINI_API_KEY").unwrap_or_default()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            generation: GenerationConfig {
                temperature: parse_env("GEMINI_TEMPERATURE").unwrap_or(defaults.temperature),
                top_p: parse_env("GEMINI_TOP_P").unwrap_or(defaults.top_p),
                top_k: parse_env("GEMINI_TOP_K").unwrap_or(defaults.top_k),
                max_output_tokens: parse_env("GEMINI_MAX_OUTPUT_TOKENS")
                    .unwrap_or(defaults.max_output_tokens),
            },
            llm_timeout_seconds: parse_env("LLM_TIMEOUT_SECONDS").unwrap_or(120),
            max_request_bytes: parse_env("MAX_REQUEST_BYTES").unwrap_or(2 * 1024 * 1024),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            gmail: gmail_from_env(),
        }
    }

    /// Rejects configuration the server cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.gemini_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "GEMINI_API_KEY is not set. Set it to a Generative Language API key.".to_string(),
            ));
        }

        if self.generation.max_output_tokens == 0 {
            return Err(AppError::ValidationError(
                "GEMINI_MAX_OUTPUT_TOKENS must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(AppError::ValidationError(format!(
                "GEMINI_TEMPERATURE must be between 0 and 2, got {}",
                self.generation.temperature
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            gemini_api_key: SecretString::from("test-api-key".to_string()),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            generation: GenerationConfig::default(),
            llm_timeout_seconds: 5,
            max_request_bytes: 2 * 1024 * 1024,
            cors_allowed_origin: None,
            gmail: None,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

fn gmail_from_env() -> Option<GmailCredentials> {
    let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

    Some(GmailCredentials {
        client_id: non_empty("GMAIL_CLIENT_ID")?,
        client_secret: SecretString::from(non_empty("GMAIL_CLIENT_SECRET")?),
        refresh_token: SecretString::from(non_empty("GMAIL_REFRESH_TOKEN")?),
        sender: non_empty("GMAIL_SENDER")?,
    })
}
