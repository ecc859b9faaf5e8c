//! Repository identifier error types.

use thiserror::Error;

/// Errors that can occur while parsing a repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The input is not of the form `owner/name`.
    #[error("'{input}' is not a valid name of a GitHub repository")]
    Invalid { input: String },
}
