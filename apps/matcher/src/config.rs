use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Application configuration loaded from environment variables.
/// Every option has a default; only malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Model selection and transport options for the LLM service.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Sent as a bearer token when present. Local Ollama needs none.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 120,
            max_tokens: 2048,
            max_retries: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = LlmConfig::default();

        Ok(Config {
            llm: LlmConfig {
                model: get("LLM_MODEL").unwrap_or(defaults.model),
                base_url: get("LLM_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.base_url),
                api_key: get("LLM_API_KEY"),
                timeout_secs: parse_or(
                    get("LLM_TIMEOUT_SECS"),
                    "LLM_TIMEOUT_SECS",
                    defaults.timeout_secs,
                )?,
                max_tokens: parse_or(
                    get("LLM_MAX_TOKENS"),
                    "LLM_MAX_TOKENS",
                    defaults.max_tokens,
                )?,
                max_retries: parse_or(
                    get("LLM_MAX_RETRIES"),
                    "LLM_MAX_RETRIES",
                    defaults.max_retries,
                )?,
            },
            port: parse_or(get("PORT"), "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
