//! Backend configuration, read from environment variables at startup.

use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://historia.db";
pub const DEFAULT_LLM_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_ENCYCLOPEDIA_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

#[derive(Debug, Clone)]
pub struct Config {
    /// sqlite:// or postgres:// URL
    pub database_url: String,
    pub llm_api_key: String,
    pub llm_api_base: String,
    pub llm_model: String,
    /// `None` leaves language-model calls unbounded
    pub llm_timeout: Option<Duration>,
    /// Summary endpoint; the article title is appended as a path segment
    pub encyclopedia_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            llm_api_key: String::new(),
            llm_api_base: DEFAULT_LLM_API_BASE.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_timeout: Some(Duration::from_secs(60)),
            encyclopedia_url: DEFAULT_ENCYCLOPEDIA_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout_secs = lookup("HISTORIA_LLM_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(60);

        Self {
            database_url: lookup("HISTORIA_DATABASE_URL").unwrap_or(defaults.database_url),
            llm_api_key: lookup("GROQ_API_KEY").unwrap_or(defaults.llm_api_key),
            llm_api_base: lookup("HISTORIA_LLM_API_BASE").unwrap_or(defaults.llm_api_base),
            llm_model: lookup("HISTORIA_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            encyclopedia_url: lookup("HISTORIA_ENCYCLOPEDIA_URL")
                .unwrap_or(defaults.encyclopedia_url),
        }
    }
}
