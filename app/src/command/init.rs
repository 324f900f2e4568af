use pathex_config::Config;

/// Strategy for creating the default configuration at `~/pathex/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::create_config()?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point provider.base_url at a running Ollama or OpenAI-compatible server");
        println!("   2. Run 'pathex extract <report.txt>' for pattern-only extraction");
        println!("   3. Add --hybrid to fill unresolved fields with the model");
        println!();
        println!("🔧 Configuration options:");
        println!("   - provider.kind: ollama or openai");
        println!("   - provider.api_key: bearer token for openai-compatible servers");
        println!("   - fallback.enabled: use the model fallback without --hybrid");
        println!("   - fallback.timeout_secs: upper bound per field query");
        println!();
        Ok(())
    }
}
