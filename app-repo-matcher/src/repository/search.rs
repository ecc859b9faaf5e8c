//! Code search results.

use crate::identifier::RepositoryIdentifier;
use serde::Deserialize;

/// Maximum results the code search API returns for one query.
pub(crate) const MAX_SEARCH_RESULTS: usize = 1000;

/// Results per page for code search.
pub(crate) const RESULTS_PER_PAGE: u32 = 100;

/// A file matched by code search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSearchHit {
    /// Path of the file inside the repository.
    pub path: String,
    /// `full_name` of the repository containing the file.
    pub repository: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    path: String,
    repository: SearchRepository,
}

#[derive(Debug, Deserialize)]
struct SearchRepository {
    full_name: String,
}

impl From<SearchItem> for CodeSearchHit {
    fn from(item: SearchItem) -> Self {
        Self {
            path: item.path,
            repository: item.repository.full_name,
        }
    }
}

/// Builds a code search query for files whose path contains any of `terms`.
///
/// Format: `repo:{owner}/{name} in:path {term} OR {term}`
pub(crate) fn build_search_query(repository: &RepositoryIdentifier, terms: &[&str]) -> String {
    format!("repo:{} in:path {}", repository, terms.join(" OR "))
}
