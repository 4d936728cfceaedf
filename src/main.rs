use anyhow::Result;
use clap::{Parser, Subcommand};

use rollout_relay::config::Config;

#[derive(Parser)]
#[command(
    name = "rollout-relay",
    about = "Reference remote rollout processor server for evaluation platforms",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the rollout processor server
    Serve {
        /// Host to bind (overrides ROLLOUT_RELAY_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides ROLLOUT_RELAY_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Fail every rollout with this message after its completion resolves
        #[arg(long)]
        force_early_error: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            force_early_error,
        } => {
            let mut config = Config::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            tracing::info!(host = %config.host, port = config.port, "starting rollout-relay");
            rollout_relay::serve(config, force_early_error).await?;
        }
    }

    Ok(())
}
