//! Configuration module
//!
//! Where the fleet lives and who is talking to it.

use anyhow::{Result, bail};

pub const DEFAULT_URL: &str = "https://deploy/";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Velociraptor server
    pub url: String,
    /// Login name; falls back to the local user
    pub username: String,
}

impl Config {
    pub fn new(url: String, username: Option<String>) -> Result<Self> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("Velociraptor URL must start with http:// or https://, got '{}'", url);
        }

        let username = username
            .filter(|name| !name.trim().is_empty())
            .or_else(local_user)
            .unwrap_or_default();

        Ok(Self { url, username })
    }
}

fn local_user() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
}
