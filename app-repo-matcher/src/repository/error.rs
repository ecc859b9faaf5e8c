//! Repository lookup error types.

use crate::host::HostError;
use crate::identifier::IdentifierError;
use thiserror::Error;

/// Errors that can occur while fetching repository data.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The identifier is malformed; skip this record.
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// The host rejected a request for this repository (HTTP 422).
    ///
    /// Usually means the name no longer resolves. `canonical` holds the
    /// canonical `full_name` when an earlier lookup resolved it, so a caller
    /// can retry under that name.
    #[error("GitHub rejected request for '{identifier}' (canonical name: {})", canonical.as_deref().unwrap_or("unknown"))]
    ValidationFailed {
        identifier: String,
        canonical: Option<String>,
        message: String,
    },

    /// A pagination link has no page number that fits the host's range.
    #[error("Unusable pagination link for '{identifier}': {link}")]
    PageLink { identifier: String, link: String },

    /// The repository document could not be decoded.
    #[error("Failed to decode repository '{identifier}': {source}")]
    Decode {
        identifier: String,
        #[source]
        source: serde_json::Error,
    },

    /// Any other host failure.
    #[error(transparent)]
    Host(#[from] HostError),
}
