use anyhow::Context;
use pathex_providers::ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_DIR: &str = "pathex";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "ProviderConfig::default_model")]
    pub model: String,
    #[serde(default = "ProviderConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: Self::default_base_url(),
            api_key: None,
            model: Self::default_model(),
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }

    const fn default_request_timeout_secs() -> u64 {
        60
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FallbackConfig {
    /// Run the model fallback on every `extract`, not only with `--hybrid`.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "FallbackConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl FallbackConfig {
    const fn default_timeout_secs() -> u64 {
        30
    }
}

impl Config {
    /// `~/pathex`.
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let path = Self::default_path()?;
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Config file not found, using defaults. Run 'pathex init' to create one."
            );
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would make every model call fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fallback.timeout_secs == 0 {
            anyhow::bail!("fallback.timeout_secs must be greater than 0");
        }
        if self.provider.request_timeout_secs == 0 {
            anyhow::bail!("provider.request_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// The defaults, as written by `pathex init`.
    pub fn template() -> anyhow::Result<String> {
        let mut json = serde_json::to_string_pretty(&Self::default())?;
        json.push('\n');
        Ok(json)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write the template to the default location.
    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE);
        Self::write_template(&config_path)?;
        Ok(config_path)
    }

    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        std::fs::write(path, Self::template()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pathex-config-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn template_parses_to_defaults() {
        let template = Config::template().expect("template should render");
        let config: Config = serde_json::from_str(&template).expect("template should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert!(!template.contains("api_key"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"provider": {"kind": "openai", "base_url": "https://api.example.com/v1", "api_key": "k"}}"#,
        )
        .expect("partial config should parse");

        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.api_key.as_deref(), Some("k"));
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.fallback, FallbackConfig::default());
    }

    #[test]
    fn unknown_provider_kind_is_rejected() {
        let parsed: Result<Config, _> = serde_json::from_str(r#"{"provider": {"kind": "bedrock"}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn write_template_refuses_overwrite() {
        let path = scratch("init.json");
        Config::write_template(&path).expect("first write should succeed");
        assert!(Config::write_template(&path).is_err());

        let loaded = Config::load(Some(&path)).expect("written template should load");
        assert_eq!(loaded, Config::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let path = scratch("missing.json");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch("broken.json");
        let _ = std::fs::write(&path, "{ not json");
        let Err(err) = Config::from_file(&path) else {
            panic!("malformed config should not load");
        };
        assert!(err.to_string().contains("Invalid config file"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zero_fallback_timeout_is_rejected() {
        let path = scratch("zero-timeout.json");
        let _ = std::fs::write(&path, r#"{"fallback": {"enabled": true, "timeout_secs": 0}}"#);
        let Err(err) = Config::load(Some(&path)) else {
            panic!("zero timeout should not load");
        };
        assert!(format!("{err:#}").contains("fallback.timeout_secs must be greater than 0"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.provider.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
