//! Classification outcomes.

use serde::Serialize;
use std::fmt;

/// Terminal classification of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Package is not in the known package to repository mapping.
    Unknown,
    /// No repository link in the app details and no popularity winner.
    NoGithubLink,
    /// No repository link, but one known repository is clearly the most popular.
    NoGithubLinkButUniquePopular,
    /// Links found, but none of them is a known repository.
    NoRepo,
    /// More than one linked repository is known.
    TooManyRepos,
    /// Only one repository is known for the package.
    UniqueRepo,
    /// Exactly one linked repository is known.
    Valid,
}

impl MatchOutcome {
    /// All outcomes, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::NoGithubLink,
        Self::NoGithubLinkButUniquePopular,
        Self::NoRepo,
        Self::TooManyRepos,
        Self::UniqueRepo,
        Self::Valid,
    ];

    /// Returns the outcome as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::NoGithubLink => "no_github_link",
            Self::NoGithubLinkButUniquePopular => "no_github_link_but_unique_popular",
            Self::NoRepo => "no_repo",
            Self::TooManyRepos => "too_many_repos",
            Self::UniqueRepo => "unique_repo",
            Self::Valid => "valid",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMatch {
    /// Package name.
    pub package_name: String,

    /// Classification.
    pub outcome: MatchOutcome,

    /// Repository emitted for the package, if any.
    pub repository: Option<String>,
}

impl PackageMatch {
    /// Creates a match that emits no repository.
    pub fn unresolved(package_name: impl Into<String>, outcome: MatchOutcome) -> Self {
        Self {
            package_name: package_name.into(),
            outcome,
            repository: None,
        }
    }

    /// Creates a match that emits `repository`.
    pub fn resolved(
        package_name: impl Into<String>,
        outcome: MatchOutcome,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            outcome,
            repository: Some(repository.into()),
        }
    }
}
