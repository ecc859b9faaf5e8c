//! Repository metadata as returned by the host.

use octocrab::models::Repository;
use serde_json::Value;

/// Canonical metadata of one repository.
///
/// Wraps the host's repository document; `full_name` is the canonical
/// identifier even when the lookup used an old name.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryMetadata {
    /// Canonical `owner/name`.
    pub full_name: String,

    /// Repository document as decoded by octocrab.
    pub repository: Repository,

    /// Number of commits on the default branch, once counted.
    pub commit_count: Option<u64>,
}

impl RepositoryMetadata {
    /// Decodes a repository document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a repository.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<Repository>(document).map(Self::from)
    }

    /// Returns true if the repository is a fork.
    #[must_use]
    pub fn is_fork(&self) -> bool {
        self.repository.fork.unwrap_or(false)
    }

    /// Default branch name (e.g., "master").
    pub fn default_branch(&self) -> Option<&str> {
        self.repository.default_branch.as_deref()
    }

    pub fn forks_count(&self) -> u64 {
        self.repository.forks_count.map_or(0, u64::from)
    }

    pub fn stargazers_count(&self) -> u64 {
        self.repository.stargazers_count.map_or(0, u64::from)
    }

    pub fn watchers_count(&self) -> u64 {
        self.repository.watchers_count.map_or(0, u64::from)
    }

    pub fn subscribers_count(&self) -> u64 {
        unsigned(self.repository.subscribers_count)
    }

    pub fn network_count(&self) -> u64 {
        unsigned(self.repository.network_count)
    }
}

impl From<Repository> for RepositoryMetadata {
    fn from(repository: Repository) -> Self {
        let full_name = match (&repository.full_name, &repository.owner) {
            (Some(full_name), _) => full_name.clone(),
            (None, Some(owner)) => format!("{}/{}", owner.login, repository.name),
            (None, None) => repository.name.clone(),
        };

        Self {
            full_name,
            repository,
            commit_count: None,
        }
    }
}

fn unsigned(count: Option<i64>) -> u64 {
    count.and_then(|count| u64::try_from(count).ok()).unwrap_or(0)
}
