//! Credential resolution and login

use anyhow::{Context, Result};
use dialoguer::Password;
use vr_client::{Credentials, VelociraptorClient};

use crate::config::Config;

const PASSWORD_ENV: &str = "VELOCIRAPTOR_PASSWORD";
const KEYRING_SERVICE: &str = "velociraptor";

/// Password from the environment, then the OS keyring, then the terminal.
fn resolve_password(username: &str, hostname: &str) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        if !password.is_empty() {
            tracing::debug!("Using password from {}", PASSWORD_ENV);
            return Ok(password);
        }
    }

    match keyring::Entry::new(KEYRING_SERVICE, username).and_then(|entry| entry.get_password()) {
        Ok(password) => {
            tracing::debug!("Using password from keyring");
            return Ok(password);
        }
        Err(err) => tracing::debug!("No keyring password: {}", err),
    }

    Password::new()
        .with_prompt(format!("{}@{} password", username, hostname))
        .interact()
        .context("Failed to read password")
}

/// Build a client for the configured server and log in.
pub async fn connect(config: &Config) -> Result<VelociraptorClient> {
    let client = VelociraptorClient::new(&config.url).context("Failed to create HTTP client")?;
    let password = resolve_password(&config.username, &client.hostname())?;

    client
        .authenticate(&Credentials::new(&config.username, password))
        .await
        .with_context(|| format!("Failed to log in to {}", client.base_url()))?;
    Ok(client)
}
