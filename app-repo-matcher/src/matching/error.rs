//! Matching error types.

use crate::repository::RepositoryError;
use thiserror::Error;

/// Errors that abort classification of a package.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Looking up a candidate repository failed.
    #[error("Failed to look up candidates of package '{package}': {source}")]
    Lookup {
        package: String,
        #[source]
        source: RepositoryError,
    },
}
