use async_trait::async_trait;
use pathex_core::{ChatMessage, LLMProvider, LLMResponse, Usage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a local Ollama server's `/api/chat` endpoint.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    default_model: String,
    request_timeout: Duration,
}

/// Request payload for `/api/chat`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Non-streaming response from `/api/chat`.
#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl OllamaProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Creating OllamaProvider at {base_url}");
        Self {
            client: Client::new(),
            base_url,
            default_model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        debug!("Sending request to Ollama: model={model}");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {status}: {body}");
        }

        let body: ChatResponse = response.json().await?;

        let usage = match (body.prompt_eval_count, body.eval_count) {
            (Some(prompt), Some(completion)) => Some(Usage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt.saturating_add(completion),
            }),
            _ => None,
        };

        debug!(
            response_len = body.message.content.len(),
            "Received response from Ollama"
        );
        Ok(LLMResponse {
            content: body.message.content,
            usage,
        })
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn chat_reads_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "llama3",
                "stream": false,
                "messages": [{"role": "user", "content": "Field: Tumor Size"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "message": {"role": "assistant", "content": "4.5 cm\nextra"},
                "done": true,
                "prompt_eval_count": 120,
                "eval_count": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(server.uri());
        let response = provider
            .chat(&[ChatMessage::user("Field: Tumor Size")], "llama3")
            .await
            .expect("chat should succeed");

        assert_eq!(response.content, "4.5 cm\nextra");
        let usage = response.usage.expect("usage should be reported");
        assert_eq!(usage.total_tokens, 124);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(server.uri());
        let err = provider
            .chat(&[ChatMessage::user("hi")], "llama3")
            .await
            .err()
            .map(|e| e.to_string());

        assert!(err.is_some_and(|e| e.contains("500") && e.contains("model not loaded")));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(server.uri());
        assert!(provider.chat(&[ChatMessage::user("hi")], "llama3").await.is_err());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": {"role": "assistant", "content": "late"}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let provider =
            OllamaProvider::new(server.uri()).with_request_timeout(Duration::from_millis(100));
        assert!(provider.chat(&[ChatMessage::user("hi")], "llama3").await.is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = OllamaProvider::new("http://localhost:11434/").with_default_model("mistral");
        assert_eq!(provider.base_url, "http://localhost:11434");
        assert_eq!(provider.get_default_model(), "mistral");
    }
}
