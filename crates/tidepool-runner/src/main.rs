// crates/tidepool-runner/src/main.rs
//
// Binary entrypoint for one proof-of-contribution run.
//
// Initializes tracing, loads configuration from the environment, wires up
// the identity provider and ledger client, runs the orchestrator once over
// the input directory, and writes the proof record.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use tidepool_core::ContributionLedger;
use tidepool_identity::HttpIdentityProvider;
use tidepool_ledger::{LedgerConfig, PoolLedgerClient, UnconfiguredLedger};
use tidepool_runner::{config::RunnerConfig, output, ProofOrchestrator};
use tidepool_scoring::{ScoringConfig, ScoringEngine};

/// Tidepool proof of contribution — one run over the configured input
/// directory.
#[derive(Parser, Debug)]
#[command(name = "tidepool-proof", version = "0.1.0", about = "Tidepool proof of contribution")]
struct Args {
    /// Override the input directory (default: INPUT_DIR or /input).
    #[arg(long)]
    input_dir: Option<String>,

    /// Override the output directory (default: OUTPUT_DIR or /output).
    #[arg(long)]
    output_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = RunnerConfig::from_env()?;
    if let Some(input_dir) = args.input_dir {
        config.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    tracing::info!("Tidepool proof of contribution v0.1.0");
    tracing::info!("Pool id: {}", config.pool_id);
    tracing::info!("Input directory: {}", config.input_dir);
    tracing::info!("Output directory: {}", config.output_dir);

    let identity = Arc::new(HttpIdentityProvider::new(
        config.identity_endpoint.clone(),
        config.identity_credential.clone(),
    )?);

    // A missing or broken ledger configuration never stops the run; the
    // scoring engine degrades to its conservative defaults instead.
    let ledger: Arc<dyn ContributionLedger> = match PoolLedgerClient::new(LedgerConfig {
        rpc_url: config.rpc_url.clone(),
        contract_address: config.contract_address.clone(),
    }) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!("ledger client unavailable: {}. Skipping ledger validation.", e);
            Arc::new(UnconfiguredLedger)
        }
    };

    let engine = ScoringEngine::new(
        ledger,
        ScoringConfig {
            owner_address: config.owner_address.clone(),
            trusted_channel: config.trusted_channel,
        },
    );

    let orchestrator = ProofOrchestrator::new(identity, engine, config.pool_id);
    let record = orchestrator.run(Path::new(&config.input_dir)).await?;
    output::write_proof(&record, Path::new(&config.output_dir))?;

    tracing::info!(
        "run complete: score {:.2}, valid {}",
        record.score,
        record.valid
    );
    Ok(())
}
