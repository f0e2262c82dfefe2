//! Fidelity CLI - biometric capture quality scoring.
//!
//! Scores face captures for identity verification and optionally submits the
//! score to a trust service.
//!
//! # Usage
//!
//! ```bash
//! # Score a single capture
//! fidelity analyze face.png
//!
//! # Score a directory as JSON Lines
//! fidelity analyze ./captures/ --format jsonl --output scores.jsonl
//!
//! # Score and submit to the trust service
//! fidelity trust face.png --identity did:example:alice
//!
//! # View configuration
//! fidelity config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Fidelity - biometric capture quality scoring.
#[derive(Parser, Debug)]
#[command(name = "fidelity")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Score image quality for biometric verification
    Analyze(cli::analyze::AnalyzeArgs),

    /// Score an image and submit it to the trust service
    Trust(cli::trust::TrustArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match fidelity_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `fidelity config path`."
            );
            fidelity_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Fidelity v{}", fidelity_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::Trust(args) => cli::trust::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, &config).await,
    }
}
