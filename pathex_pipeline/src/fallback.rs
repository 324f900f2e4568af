//! Model fallback extractor.
//!
//! Asks a generative model for a single field's value. Every call is
//! best-effort: one request, bounded by a timeout, never retried, and any
//! failure is reported as the sentinel.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use pathex_core::{ChatMessage, FieldResolver, LLMProvider, NOT_MENTIONED};

use crate::clean::{clean_model_output, first_line};
use crate::prompt::build_prompt;

/// Upper bound on a single field query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a model query produced no usable value.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("model request failed: {0}")]
    Provider(anyhow::Error),

    #[error("model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Resolves one field per call through an [`LLMProvider`].
pub struct ModelFallbackExtractor<P> {
    provider: P,
    model: String,
    timeout: Duration,
}

impl<P: LLMProvider> ModelFallbackExtractor<P> {
    /// Use the provider's default model and [`DEFAULT_TIMEOUT`].
    pub fn new(provider: P) -> Self {
        let model = provider.get_default_model().to_string();
        Self {
            provider,
            model,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Query the model once and normalize its reply.
    ///
    /// A reply that normalizes to the sentinel is still `Ok`; errors are only
    /// for calls that produced nothing to normalize.
    pub async fn try_resolve(&self, text: &str, field_name: &str) -> Result<String, FallbackError> {
        let messages = [ChatMessage::user(build_prompt(field_name, text))];

        let response = tokio::time::timeout(self.timeout, self.provider.chat(&messages, &self.model))
            .await
            .map_err(|_| FallbackError::Timeout(self.timeout))?
            .map_err(FallbackError::Provider)?;

        let line = first_line(&response.content);
        if line.is_empty() {
            return Err(FallbackError::EmptyResponse);
        }

        let value = clean_model_output(line);
        debug!(field = field_name, raw = line, value = %value, "Model fallback reply");
        Ok(value)
    }
}

#[async_trait]
impl<P: LLMProvider> FieldResolver for ModelFallbackExtractor<P> {
    async fn resolve(&self, text: &str, field_name: &str) -> String {
        match self.try_resolve(text, field_name).await {
            Ok(value) => value,
            Err(e) => {
                warn!(field = field_name, error = %e, "Model fallback failed, using sentinel");
                NOT_MENTIONED.to_string()
            }
        }
    }
}
