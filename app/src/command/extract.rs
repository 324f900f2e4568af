use anyhow::Context;
use pathex_config::Config;
use pathex_core::load_document;
use pathex_fields::PatternExtractor;
use pathex_pipeline::{HybridExtractor, ModelFallbackExtractor};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Input parameters for the extract command.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    /// Missing paths are reported through the JSON error object.
    pub path: Option<PathBuf>,
    /// Consult the model for fields the patterns leave unresolved.
    pub hybrid: bool,
    pub model: Option<String>,
    /// Print per-field provenance instead of the flat mapping.
    pub explain: bool,
    pub config: Option<PathBuf>,
}

/// Strategy for extracting fields from one report.
///
/// Output always goes to stdout as JSON. Failures are reported as
/// `{"error": "..."}` with exit status 1.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        match run(input).await {
            Ok(json) => {
                println!("{json}");
                Ok(())
            }
            Err(e) => {
                println!("{}", error_json(&e));
                std::process::exit(1);
            }
        }
    }
}

fn error_json(error: &anyhow::Error) -> serde_json::Value {
    serde_json::json!({ "error": format!("{error:#}") })
}

async fn run(input: ExtractInput) -> anyhow::Result<String> {
    let path: &Path = input
        .path
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No file path provided"))?;
    let text = load_document(path)?;
    let patterns = PatternExtractor::standard().context("Failed to build field table")?;

    let config = if input.hybrid || input.config.is_some() {
        Config::load(input.config.as_deref())?
    } else {
        // Pattern-only runs stay quiet when no config file exists.
        Config::default_path()
            .ok()
            .filter(|p| p.exists())
            .map(|p| Config::from_file(&p))
            .transpose()?
            .unwrap_or_default()
    };

    if !(input.hybrid || config.fallback.enabled) {
        info!(path = %path.display(), "Running pattern extraction");
        return if input.explain {
            Ok(serde_json::to_string_pretty(&patterns.extract_detailed(&text))?)
        } else {
            Ok(serde_json::to_string_pretty(&patterns.extract(&text))?)
        };
    }

    let mut fallback = ModelFallbackExtractor::new(super::build_provider(&config))
        .with_timeout(Duration::from_secs(config.fallback.timeout_secs));
    if let Some(model) = input.model {
        fallback = fallback.with_model(model);
    }
    info!(path = %path.display(), model = fallback.model(), "Running hybrid extraction");

    let hybrid = HybridExtractor::new(patterns, fallback);
    if input.explain {
        Ok(serde_json::to_string_pretty(&hybrid.merge_detailed(&text).await)?)
    } else {
        Ok(serde_json::to_string_pretty(&hybrid.merge(&text).await)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(path: Option<PathBuf>) -> ExtractInput {
        ExtractInput {
            path,
            hybrid: false,
            model: None,
            explain: false,
            config: None,
        }
    }

    #[tokio::test]
    async fn missing_path_reports_error_object() {
        let Err(e) = run(input(None)).await else {
            panic!("extract without a path should fail");
        };
        assert_eq!(
            error_json(&e),
            serde_json::json!({ "error": "No file path provided" })
        );
    }

    #[tokio::test]
    async fn unreadable_file_is_an_error() {
        let path = std::env::temp_dir().join("pathex-extract-missing-report.txt");
        let _ = std::fs::remove_file(&path);
        assert!(run(input(Some(path))).await.is_err());
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn pattern_only_run_prints_flat_mapping() {
        let path = std::env::temp_dir().join(format!("pathex-extract-{}.txt", std::process::id()));
        std::fs::write(&path, "Total blocks taken: 12\n").expect("report should be written");

        let mut args = input(Some(path.clone()));
        args.config = Some(std::env::temp_dir().join("pathex-extract-no-config.json"));
        // An explicit config path that does not exist fails the run.
        assert!(run(args).await.is_err());

        let out = run(input(Some(path.clone()))).await;
        let _ = std::fs::remove_file(&path);
        let json: serde_json::Value =
            serde_json::from_str(&out.expect("pattern-only run should succeed"))
                .expect("output should be JSON");
        assert_eq!(json["Block Count"], "12");
    }
}
