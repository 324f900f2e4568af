use async_trait::async_trait;
use pathex_core::{ChatMessage, LLMProvider, LLMResponse, Usage};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for any service exposing an OpenAI-style `/chat/completions`
/// endpoint.
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    default_model: String,
    request_timeout: Duration,
}

impl OpenAiCompatibleProvider {
    pub fn new(base_url: impl Into<String>, default_model: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Creating OpenAiCompatibleProvider at {base_url}");
        Self {
            client: Client::new(),
            api_key: None,
            base_url,
            default_model: default_model.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn parse_usage(response: &serde_json::Value) -> Option<Usage> {
        let u = response["usage"].as_object()?;
        let count = |key: &str| {
            u.get(key)
                .and_then(serde_json::Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        Some(Usage {
            prompt_tokens: count("prompt_tokens"),
            completion_tokens: count("completion_tokens"),
            total_tokens: count("total_tokens"),
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAiCompatibleProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = json!({
            "model": model,
            "messages": messages,
        });

        debug!("Sending request to chat completions API: model={model}");

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(self.request_timeout)
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
            .to_string();

        Ok(LLMResponse {
            content,
            usage: Self::parse_usage(&response),
        })
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}
