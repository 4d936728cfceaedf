use std::time::Duration;

use reqwest::Client;

use super::error::LlmError;
use super::types::{CompletionRequest, CompletionResponse};

/// Thin client for an OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct LlmClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            base_url,
            client,
        }
    }

    /// Send one completion request. `base_url_override` lets a single rollout
    /// target a different inference endpoint than the configured default.
    pub async fn complete(
        &self,
        req: &CompletionRequest,
        base_url_override: Option<&str>,
    ) -> Result<CompletionResponse, LlmError> {
        let base = base_url_override.unwrap_or(&self.base_url);
        let url = format!("{}/chat/completions", base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<CompletionResponse>().await?;
        Ok(body)
    }
}
