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

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, FieldsStrategy, InfoStrategy, InitStrategy,
    VersionStrategy,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pathex")]
#[command(about = "Structured field extraction from pathology reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract all fields from a report and print them as JSON
    Extract {
        /// Plain-text report to read
        path: Option<PathBuf>,

        /// Fill unresolved fields with the model fallback
        #[arg(long)]
        hybrid: bool,

        /// Model to use for the fallback
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Print per-field provenance
        #[arg(long)]
        explain: bool,

        /// Config file to use instead of ~/pathex/config.json
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the standard field table
    Fields,
    /// Initialize configuration
    Init,
    /// Show the effective configuration
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version
    Version,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON for extract, so keep it quiet unless asked.
    init_tracing(match cli.command {
        Commands::Extract { .. } => "warn",
        _ => "info",
    });

    match cli.command {
        Commands::Extract {
            path,
            hybrid,
            model,
            explain,
            config,
        } => {
            ExtractStrategy
                .execute(ExtractInput {
                    path,
                    hybrid,
                    model,
                    explain,
                    config,
                })
                .await
        }
        Commands::Fields => FieldsStrategy.execute(()).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info { config } => InfoStrategy.execute(config).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
