//! Runtime configuration, loaded once at process start.

use std::env;

/// Settings for the server and its two external collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub llm_api_key: String,
    pub llm_base_url: String,
    /// Tracing ingestion endpoint; `None` disables span export.
    pub tracing_endpoint: Option<String>,
    pub tracing_api_key: String,
}

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("ROLLOUT_RELAY_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("ROLLOUT_RELAY_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROLLOUT_RELAY_PORT is not a valid port: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let llm_api_key = env::var("LLM_API_KEY").unwrap_or_default();
        if llm_api_key.is_empty() {
            tracing::warn!("LLM_API_KEY is not set; completion calls will be unauthenticated");
        }
        let llm_base_url =
            env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string());

        let tracing_endpoint = env::var("TRACING_ENDPOINT").ok().filter(|s| !s.is_empty());
        if tracing_endpoint.is_none() {
            tracing::warn!("TRACING_ENDPOINT is not set; span export is disabled");
        }
        let tracing_api_key = env::var("TRACING_API_KEY").unwrap_or_default();

        Ok(Self {
            host,
            port,
            llm_api_key,
            llm_base_url,
            tracing_endpoint,
            tracing_api_key,
        })
    }
}
