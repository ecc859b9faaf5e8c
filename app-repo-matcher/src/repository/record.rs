//! Flat row form of repository metadata.

use super::metadata::RepositoryMetadata;
use serde::Serialize;
use serde_json::Value;

/// Output columns, in order.
pub const COLUMNS: [&str; 30] = [
    "id",
    "name",
    "full_name",
    "description",
    "size",
    "private",
    "fork",
    "archived",
    "created_at",
    "updated_at",
    "pushed_at",
    "language",
    "default_branch",
    "homepage",
    "forks_count",
    "stargazers_count",
    "subscribers_count",
    "watchers_count",
    "network_count",
    "has_downloads",
    "has_issues",
    "has_pages",
    "has_projects",
    "has_wiki",
    "owner_id",
    "owner_login",
    "owner_type",
    "parent_id",
    "source_id",
    "commit_count",
];

/// Placeholder id for a missing owner, parent or source.
const MISSING_ID: i64 = -1;

/// Timestamp layout used by the host.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One row of the repository metadata table.
///
/// Field order defines the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub size: u64,
    pub private: bool,
    pub fork: bool,
    pub archived: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    pub language: Option<String>,
    pub default_branch: Option<String>,
    pub homepage: Option<String>,
    pub forks_count: u64,
    pub stargazers_count: u64,
    pub subscribers_count: u64,
    pub watchers_count: u64,
    pub network_count: u64,
    pub has_downloads: bool,
    pub has_issues: bool,
    pub has_pages: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub owner_id: i64,
    pub owner_login: Option<String>,
    pub owner_type: Option<String>,
    pub parent_id: i64,
    pub source_id: i64,
    pub commit_count: Option<u64>,
}

impl From<&RepositoryMetadata> for RepositoryRecord {
    fn from(metadata: &RepositoryMetadata) -> Self {
        let repo = &metadata.repository;
        let owner = repo.owner.as_ref();

        Self {
            id: repo.id.into_inner(),
            name: repo.name.clone(),
            full_name: metadata.full_name.clone(),
            description: repo.description.clone(),
            size: repo.size.map_or(0, u64::from),
            private: repo.private.unwrap_or(false),
            fork: metadata.is_fork(),
            archived: repo.archived.unwrap_or(false),
            created_at: repo.created_at.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            updated_at: repo.updated_at.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            pushed_at: repo.pushed_at.map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
            language: repo
                .language
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
            default_branch: repo.default_branch.clone(),
            homepage: repo.homepage.clone(),
            forks_count: metadata.forks_count(),
            stargazers_count: metadata.stargazers_count(),
            subscribers_count: metadata.subscribers_count(),
            watchers_count: metadata.watchers_count(),
            network_count: metadata.network_count(),
            has_downloads: repo.has_downloads.unwrap_or(false),
            has_issues: repo.has_issues.unwrap_or(false),
            has_pages: repo.has_pages.unwrap_or(false),
            has_projects: repo.has_projects.unwrap_or(false),
            has_wiki: repo.has_wiki.unwrap_or(false),
            owner_id: owner.map_or(MISSING_ID, |owner| signed(owner.id.into_inner())),
            owner_login: owner.map(|owner| owner.login.clone()),
            owner_type: owner.map(|owner| owner.r#type.clone()),
            parent_id: repo
                .parent
                .as_ref()
                .map_or(MISSING_ID, |parent| signed(parent.id.into_inner())),
            source_id: repo
                .source
                .as_ref()
                .map_or(MISSING_ID, |source| signed(source.id.into_inner())),
            commit_count: metadata.commit_count,
        }
    }
}

fn signed(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}
