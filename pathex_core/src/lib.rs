#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod document;
pub mod result;

pub use document::{DocumentError, load_document, normalize_paragraphs};
pub use result::{ExtractionResult, NOT_MENTIONED, is_unresolved};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A chat-capable generative model service.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse>;
    fn get_default_model(&self) -> &str;
}

#[async_trait]
impl<T: LLMProvider + ?Sized> LLMProvider for Arc<T> {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        (**self).chat(messages, model).await
    }

    fn get_default_model(&self) -> &str {
        (**self).get_default_model()
    }
}

#[async_trait]
impl<T: LLMProvider + ?Sized> LLMProvider for Box<T> {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        (**self).chat(messages, model).await
    }

    fn get_default_model(&self) -> &str {
        (**self).get_default_model()
    }
}

/// Resolves a single field's value from report text when pattern matching
/// could not.
///
/// Implementations must never fail: anything that goes wrong is reported as
/// [`NOT_MENTIONED`].
#[async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(&self, text: &str, field_name: &str) -> String;
}

#[async_trait]
impl<T: FieldResolver + ?Sized> FieldResolver for Arc<T> {
    async fn resolve(&self, text: &str, field_name: &str) -> String {
        (**self).resolve(text, field_name).await
    }
}
