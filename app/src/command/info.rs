use pathex_config::{Config, ProviderKind};
use std::path::PathBuf;

/// Strategy for displaying the effective configuration.
///
/// API keys are masked. Defaults are shown when no config file exists.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load(input.as_deref())?;
        let source = match input {
            Some(path) => path.display().to_string(),
            None => Config::default_path()?.display().to_string(),
        };

        println!("=== pathex Configuration ===\n");
        println!("Config file: {source}");
        println!();

        println!("Provider:");
        let kind = match config.provider.kind {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
        };
        println!("  Kind: {kind}");
        println!("  Base URL: {}", config.provider.base_url);
        println!("  Model: {}", config.provider.model);
        println!(
            "  API Key: {}",
            config
                .provider
                .api_key
                .as_deref()
                .map_or_else(|| "(not set)".to_string(), mask_api_key)
        );
        println!(
            "  Request Timeout: {}s",
            config.provider.request_timeout_secs
        );
        println!();

        println!("Fallback:");
        println!("  Enabled by default: {}", config.fallback.enabled);
        println!("  Per-field Timeout: {}s", config.fallback.timeout_secs);

        Ok(())
    }
}

fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}
