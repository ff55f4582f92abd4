//! Fleet API errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong between `vr` and the fleet server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Non-2xx reply; `message` is the raw response body
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A lookup by name or key came back empty
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request could not be formed from local state
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server has no endpoint for this operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// True for empty lookups and for 404 replies
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::ApiError { status: 404, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_covers_lookup_and_status() {
        assert!(ClientError::api_error(404, "gone").is_not_found());
        assert!(ClientError::NotFound("swarm".to_string()).is_not_found());
        assert!(!ClientError::api_error(405, "no").is_not_found());
        assert!(!ClientError::Unsupported("deploys".to_string()).is_not_found());
    }
}
