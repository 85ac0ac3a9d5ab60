//! Service configuration
//!
//! Everything is read from the environment (optionally seeded from a `.env`
//! file by `main`). Unset variables fall back to defaults; set-but-unparseable
//! numbers are errors.

use crate::llm::DEFAULT_GEMINI_MODEL;
use crate::notifier::EmailJsConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL_CALL_CAP: u32 = 2;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Caller origins allowed by CORS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// Configuration for the generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    pub model: String,
    /// Gateway URL replacing the public endpoint
    pub gateway: Option<String>,
    pub timeout: Duration,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub model_call_cap: u32,
    pub llm: LlmConfig,
    pub notify_timeout: Duration,
    pub emailjs: Option<EmailJsConfig>,
    pub resume_profile_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = parse_number(&get, "RESUME_PORT", DEFAULT_PORT)?;
        let model_call_cap = parse_number(&get, "MODEL_CALL_CAP", DEFAULT_MODEL_CALL_CAP)?;
        let generation_timeout =
            parse_number(&get, "GENERATION_TIMEOUT_SECS", DEFAULT_GENERATION_TIMEOUT_SECS)?;
        let notify_timeout =
            parse_number(&get, "NOTIFY_TIMEOUT_SECS", DEFAULT_NOTIFY_TIMEOUT_SECS)?;

        let emailjs = match (
            get("EMAILJS_SERVICE_ID"),
            get("EMAILJS_TEMPLATE_ID"),
            get("EMAILJS_PUBLIC_KEY"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(EmailJsConfig {
                service_id,
                template_id,
                public_key,
                private_key: get("EMAILJS_PRIVATE_KEY"),
            }),
            _ => None,
        };

        Ok(Self {
            port,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map_or(AllowedOrigins::Any, |raw| AllowedOrigins::parse(&raw)),
            model_call_cap,
            llm: LlmConfig {
                gemini_api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                gateway: get("LLM_GATEWAY"),
                timeout: Duration::from_secs(generation_timeout),
            },
            notify_timeout: Duration::from_secs(notify_timeout),
            emailjs,
            resume_profile_path: get("RESUME_PROFILE_PATH").map(PathBuf::from),
        })
    }
}

fn parse_number<T, F>(get: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
