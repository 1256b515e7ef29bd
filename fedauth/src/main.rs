//! fedauth - federated sign-in toolkit.
//!
//! Generates sign-in nonces and exchanges Apple, Google and Facebook
//! credentials for a unified identity.

mod cli;

use clap::Parser;
use fedauth::config::{load_config, settings::env};
use fedauth::error::FedAuthError;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env::LOG_LEVEL).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the command
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), FedAuthError> {
    let config = load_config()?;

    match cli.command {
        Commands::Nonce { length } => {
            cli::commands::handle_nonce(&config, length);
            Ok(())
        },
        Commands::Exchange { provider } => cli::commands::handle_exchange(&config, provider).await,
        Commands::Config => {
            cli::commands::handle_config(&config);
            Ok(())
        },
    }
}
