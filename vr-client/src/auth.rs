//! Session login

use std::fmt;
use tracing::{debug, info};

use crate::VelociraptorClient;
use crate::error::{ClientError, Result};

/// Marker present on the login page
const LOGIN_MARKER: &str = "baton";

/// Username and password used to open a session
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl VelociraptorClient {
    // =============================================================================
    // Authentication
    // =============================================================================

    /// Open a session
    ///
    /// Loads the home page; when the server answers with its login form, the
    /// credentials are posted to it. The session cookie stays in the client's
    /// cookie store for every later request.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<()> {
        info!(
            "Authenticating to {} as {}",
            self.base_url, credentials.username
        );

        let home = format!("{}/", self.base_url);
        let response = self.client.get(&home).send().await?;
        let response = Self::check_status(response).await?;
        let login_url = response.url().clone();
        let page = response.text().await?;

        if !page.contains(LOGIN_MARKER) {
            debug!("Session already authenticated");
            return Ok(());
        }

        debug!("POST {}", login_url);
        let response = self
            .client
            .post(login_url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let page = response.text().await?;

        if page.contains(LOGIN_MARKER) {
            return Err(ClientError::AuthenticationFailed(format!(
                "login rejected for {}",
                credentials.username
            )));
        }

        Ok(())
    }
}
