//! Engine configuration from environment variables.

use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::easy_diffusion::{AccessCredentials, DEFAULT_RENDER_BASE_URL};
use crate::infrastructure::image_render::PollPolicy;
use crate::infrastructure::openai::{
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE,
};

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_STORY_DB: &str = "stories.db";
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "localhost:5173,aicyoa.com";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// `STORY_DB` value selecting the in-memory store.
const MEMORY_STORE: &str = "memory";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub openai: OpenAiConfig,
    pub render: RenderConfig,
    pub store: StoryStoreConfig,
    /// Origin substrings accepted for cross-origin requests
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub base_url: String,
    pub model: String,
    pub access: AccessCredentials,
    pub poll: PollPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryStoreConfig {
    Sqlite(String),
    Memory,
}

impl EngineConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for each variable. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_port = match get("SERVER_PORT") {
            Some(v) => parse("SERVER_PORT", v)?,
            None => match get("PORT") {
                Some(v) => parse("PORT", v)?,
                None => DEFAULT_SERVER_PORT,
            },
        };

        let temperature = get("OPENAI_TEMPERATURE")
            .map(|v| parse("OPENAI_TEMPERATURE", v))
            .transpose()?
            .unwrap_or(DEFAULT_TEMPERATURE);

        let interval_ms = get("RENDER_POLL_INTERVAL_MS")
            .map(|v| parse("RENDER_POLL_INTERVAL_MS", v))
            .transpose()?
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        // Zero is rejected; unset means no limit
        let max_attempts = get("RENDER_MAX_POLLS")
            .map(|v| parse::<NonZeroU32>("RENDER_MAX_POLLS", v))
            .transpose()?
            .map(NonZeroU32::get);

        let store = match get("STORY_DB") {
            Some(v) if v.eq_ignore_ascii_case(MEMORY_STORE) => StoryStoreConfig::Memory,
            Some(v) => StoryStoreConfig::Sqlite(v),
            None => StoryStoreConfig::Sqlite(DEFAULT_STORY_DB.to_string()),
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY").unwrap_or_default(),
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                temperature,
            },
            render: RenderConfig {
                base_url: get("SD_BASE_URL").unwrap_or_else(|| DEFAULT_RENDER_BASE_URL.to_string()),
                model: get("SD_MODEL").unwrap_or_default(),
                access: AccessCredentials::new(
                    get("CF_ACCESS_CLIENT_ID").unwrap_or_default(),
                    get("CF_ACCESS_CLIENT_SECRET").unwrap_or_default(),
                ),
                poll: PollPolicy {
                    interval: Duration::from_millis(interval_ms),
                    max_attempts,
                },
            },
            store,
            cors_allowed_origins,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
