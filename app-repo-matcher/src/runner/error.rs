//! Runner error types.

use crate::config::ConfigError;
use crate::host::HostError;
use crate::matching::MatchError;
use crate::repository::RepositoryError;

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GitHub API client errors.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Classification errors.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Repository lookup errors.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Failed to read or write a CSV file.
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Failed to read or write a file.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An app details file is not valid JSON.
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
