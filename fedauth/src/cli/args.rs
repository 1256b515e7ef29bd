//! Command-line argument parsing.

use std::num::NonZeroUsize;

use clap::{Parser, Subcommand};

/// Federated sign-in toolkit.
///
/// Generates sign-in nonces and exchanges provider credentials for a unified
/// identity with the configured identity backend.
#[derive(Parser, Debug)]
#[command(name = "fedauth")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a fresh single-use nonce.
    Nonce {
        /// Number of characters (defaults to the configured length).
        #[arg(short, long)]
        length: Option<NonZeroUsize>,
    },

    /// Exchange a provider credential for a unified user.
    Exchange {
        #[command(subcommand)]
        provider: ExchangeCommands,
    },

    /// Show the effective configuration.
    Config,
}

/// Provider credentials accepted by `fedauth exchange`.
#[derive(Subcommand, Debug)]
pub enum ExchangeCommands {
    /// Apple identity token and the raw nonce it was issued for.
    Apple {
        /// Identity token (JWT).
        #[arg(long, env = "FEDAUTH_APPLE_ID_TOKEN")]
        id_token: String,

        /// Raw nonce sent with the authorization request.
        #[arg(long)]
        nonce: String,
    },

    /// Google ID token and access token.
    Google {
        /// ID token (JWT).
        #[arg(long, env = "FEDAUTH_GOOGLE_ID_TOKEN")]
        id_token: String,

        /// OAuth access token.
        #[arg(long, env = "FEDAUTH_GOOGLE_ACCESS_TOKEN")]
        access_token: String,
    },

    /// Facebook access token.
    Facebook {
        /// Access token.
        #[arg(long, env = "FEDAUTH_FACEBOOK_ACCESS_TOKEN")]
        access_token: String,
    },
}
