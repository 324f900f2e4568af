//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use pathex_config::{Config, ProviderKind};
use pathex_core::LLMProvider;
use pathex_providers::{OllamaProvider, OpenAiCompatibleProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod extract;
mod fields;
mod info;
mod init;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use fields::FieldsStrategy;
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Contract shared by all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// Per-command input, so each strategy takes typed parameters.
    type Input;

    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Build the configured model provider.
fn build_provider(config: &Config) -> Arc<dyn LLMProvider> {
    let provider = &config.provider;
    let request_timeout = Duration::from_secs(provider.request_timeout_secs);

    info!(kind = ?provider.kind, base_url = %provider.base_url, "Using model provider");

    match provider.kind {
        ProviderKind::Ollama => Arc::new(
            OllamaProvider::new(provider.base_url.clone())
                .with_default_model(provider.model.clone())
                .with_request_timeout(request_timeout),
        ),
        ProviderKind::OpenAi => {
            let mut client =
                OpenAiCompatibleProvider::new(provider.base_url.clone(), provider.model.clone())
                    .with_request_timeout(request_timeout);
            if let Some(key) = &provider.api_key {
                client = client.with_api_key(key.clone());
            }
            Arc::new(client)
        }
    }
}
