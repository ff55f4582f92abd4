//! VR HTTP Client
//!
//! A type-safe HTTP client for the Velociraptor fleet API.
//!
//! The orchestrator only depends on the [`FleetClient`] trait; this crate also
//! provides [`VelociraptorClient`], the implementation that talks to a real
//! server over its v1 REST API with a cookie-backed login session.
//!
//! # Example
//!
//! ```no_run
//! use vr_client::{Credentials, VelociraptorClient};
//! use vr_core::dto::swarm::SwarmQuery;
//!
//! #[tokio::main]
//! async fn main() -> vr_client::Result<()> {
//!     let client = VelociraptorClient::new("https://deploy.example.com/")?;
//!     client
//!         .authenticate(&Credentials::new("alice", "secret"))
//!         .await?;
//!
//!     let swarms = client.load_swarms(&SwarmQuery::from_pattern("shop")).await?;
//!     println!("{} swarms", swarms.len());
//!     Ok(())
//! }
//! ```

mod auth;
mod builds;
pub mod error;
mod fleet;
mod ingredients;
mod procs;
mod releases;
mod swarms;

// Re-export commonly used types
pub use auth::Credentials;
pub use error::{ClientError, Result};
pub use fleet::FleetClient;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Query appended to list reads so the API returns JSON and does not paginate
pub(crate) const LIST_PARAMS: [(&str, &str); 2] = [("format", "json"), ("limit", "9999")];

/// Query appended to single-resource reads
pub(crate) const DETAIL_PARAMS: [(&str, &str); 1] = [("format", "json")];

/// List envelope used by every collection endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub objects: Vec<T>,
}

/// HTTP client for the Velociraptor API
///
/// Endpoints are grouped by resource:
/// - Swarms (list, load, patch, dispatch)
/// - Builds and releases
/// - Ingredients
/// - Hosts and procs
/// - Uptest runs
///
/// The underlying reqwest client keeps the session cookie obtained by
/// [`VelociraptorClient::authenticate`], so one value should be created per
/// run and shared by reference.
#[derive(Debug, Clone)]
pub struct VelociraptorClient {
    /// Base URL of the server without trailing slash (e.g., "https://deploy")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl VelociraptorClient {
    /// Create a new client with its own cookie store
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server (e.g., "https://deploy/")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    /// The client should have a cookie store enabled or the login session
    /// will not survive between requests.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host name part of the base URL, used in password prompts
    pub fn hostname(&self) -> String {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.base_url.clone())
    }

    /// Absolute URL for an API path or resource URI
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET a single resource
    pub(crate) async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).query(&DETAIL_PARAMS).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., PATCH or action triggers)
    async fn handle_empty_response(&self, response: Response) -> Result<()> {
        Self::check_status(response).await?;
        Ok(())
    }

    /// Handle a 201 response and return the resource URI of the created object
    ///
    /// The URI is taken from the `Location` header, falling back to a
    /// `resource_uri` field in the body.
    async fn handle_created(&self, response: Response) -> Result<String> {
        let response = Self::check_status(response).await?;

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(location) = location {
            return Ok(resource_path(&location));
        }

        #[derive(Deserialize)]
        struct Created {
            resource_uri: String,
        }
        let created: Created = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Created resource has no location: {}", e))
        })?;
        Ok(created.resource_uri)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

/// Path component of a Location header (which may be absolute)
pub(crate) fn resource_path(location: &str) -> String {
    match reqwest::Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => location.to_string(),
    }
}

/// Numeric id at the end of a resource URI such as `/api/v1/builds/12/`
pub(crate) fn resource_id(resource_uri: &str) -> Option<u64> {
    resource_uri
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}
