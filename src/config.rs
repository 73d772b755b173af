use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Manga catalog API base URL (no trailing slash)
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Models to try for recommendation text, in order
    #[serde(default = "default_generation_models")]
    pub generation_models: Vec<String>,

    /// Attempts per model when the model reports overload
    #[serde(default = "default_generation_max_attempts")]
    pub generation_max_attempts: u32,

    /// Backoff step in milliseconds; attempt `n` waits `(n + 1) * step`
    #[serde(default = "default_generation_backoff_ms")]
    pub generation_backoff_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_api_url() -> String {
    "https://gomanga-api.vercel.app".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generation_models() -> Vec<String> {
    vec!["gemini-2.5-flash".to_string(), "gemini-1.5-flash".to_string()]
}

fn default_generation_max_attempts() -> u32 {
    3
}

fn default_generation_backoff_ms() -> u64 {
    1000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.generation_models.is_empty() {
            anyhow::bail!("GENERATION_MODELS must name at least one model");
        }
        if self.generation_max_attempts == 0 {
            anyhow::bail!("GENERATION_MAX_ATTEMPTS must be at least 1");
        }
        Ok(())
    }

    pub fn generation_backoff(&self) -> Duration {
        Duration::from_millis(self.generation_backoff_ms)
    }

    /// Catalog base URL with any trailing slash removed
    pub fn catalog_base(&self) -> &str {
        self.catalog_api_url.trim_end_matches('/')
    }
}
