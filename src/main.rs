// Smart City AI - Complaint category classifier
// Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use smartcity_ai::config::load_config;
use smartcity_ai::server::PredictorServer;
use smartcity_ai::training::Trainer;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "smartcity-ai")]
#[command(about = "Complaint category classifier: trainer and prediction service", version)]
struct Args {
    /// Path to a TOML config file (default: ./smartcity.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the classifier from the labeled dataset and save it
    Train,
    /// Run the HTTP prediction service
    Serve {
        /// Bind address (overrides server.bind_address)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing();

    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Train => {
            let trainer = Trainer::new(config);
            let report = trainer.run()?;
            tracing::info!(
                accuracy = %format!("{:.2}", report.evaluation.accuracy),
                path = %report.model_path.display(),
                "Model saved successfully"
            );
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            // Model load gates readiness: nothing is bound until it succeeds
            let server = PredictorServer::new(&config)?;
            server.serve().await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    // Default: INFO level, can be overridden with RUST_LOG env var
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
