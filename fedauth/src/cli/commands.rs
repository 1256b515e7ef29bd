//! Command implementations.

use std::num::NonZeroUsize;
use std::sync::Arc;

use fedauth::auth::{FederatedAuthClient, Nonce, NonceGenerator, ProviderCredential, UnifiedUser};
use fedauth::backend::HttpIdentityBackend;
use fedauth::config::FedAuthConfig;
use fedauth::error::FedAuthError;

use crate::cli::ExchangeCommands;

/// Handle the `fedauth nonce` command.
pub fn handle_nonce(config: &FedAuthConfig, length: Option<NonZeroUsize>) {
    let generator = NonceGenerator::new();
    let nonce = generator.generate_with_length(length.unwrap_or(config.nonce.length));
    println!("{}", nonce.as_str());
}

/// Handle the `fedauth exchange` command.
pub async fn handle_exchange(
    config: &FedAuthConfig,
    command: ExchangeCommands,
) -> Result<(), FedAuthError> {
    let credential = match command {
        ExchangeCommands::Apple { id_token, nonce } => {
            ProviderCredential::apple(id_token, Nonce::from_issued(nonce))
        },
        ExchangeCommands::Google {
            id_token,
            access_token,
        } => ProviderCredential::google(id_token, access_token),
        ExchangeCommands::Facebook { access_token } => ProviderCredential::facebook(access_token),
    };

    println!("Exchanging {} credential with {}...", credential.kind(), config.backend.base_url);

    let backend = HttpIdentityBackend::new(&config.backend)?;
    let client = FederatedAuthClient::new(Arc::new(backend));
    let user = client.exchange(credential).await?;

    print_user(&user);
    Ok(())
}

/// Handle the `fedauth config` command.
pub fn handle_config(config: &FedAuthConfig) {
    println!("Backend");
    println!("  Base URL:     {}", config.backend.base_url);
    println!("  Request URI:  {}", config.backend.request_uri);
    println!("  Timeout:      {}s", config.backend.timeout_secs);
    println!(
        "  API key:      {}",
        config.masked_api_key().unwrap_or_else(|| "(not set)".to_string())
    );
    println!();
    println!("Google");
    println!(
        "  Client ID:    {}",
        config.google.client_id.as_deref().unwrap_or("(not set)")
    );
    println!();
    println!("Nonce");
    println!("  Length:       {}", config.nonce.length);
}

fn print_user(user: &UnifiedUser) {
    println!();
    println!("Signed in");
    println!();
    println!("  UID:    {}", user.uid);
    if let Some(name) = &user.display_name {
        println!("  Name:   {name}");
    }
    if let Some(email) = &user.email {
        println!("  Email:  {email}");
    }
    if let Some(photo) = &user.photo_url {
        println!("  Photo:  {photo}");
    }
}
