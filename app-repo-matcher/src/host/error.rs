//! Host API error types.

use crate::rate_limit::ResourceClass;
use thiserror::Error;

/// Errors that can occur while talking to the GitHub API.
///
/// None of these are retried by the client; quota exhaustion never shows up
/// here because it is resolved by waiting.
#[derive(Debug, Error)]
pub enum HostError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A raw response could not be rebuilt for octocrab's decoders.
    #[error("Invalid HTTP response: {0}")]
    Http(#[from] http::Error),

    /// The host answered with a status the caller did not expect.
    #[error("GitHub returned status {status} for '{url}': {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// The response body is not the JSON the endpoint documents.
    #[error("Failed to decode response from '{url}': {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The quota query did not report the requested resource class.
    #[error("Rate limit response has no entry for resource '{resource}'")]
    QuotaQuery { resource: ResourceClass },
}

impl HostError {
    /// Returns the HTTP status if the host rejected the request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
