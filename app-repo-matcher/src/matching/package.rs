//! Per-package matching state.

use super::outcome::MatchOutcome;
use std::collections::{BTreeSet, HashSet};

/// A package under classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    package_name: String,
    extracted_links: BTreeSet<String>,
    known_repos: Vec<String>,
    verified_links: BTreeSet<String>,
}

/// What the decision rules say about a package before any host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Classification is final.
    Resolved {
        outcome: MatchOutcome,
        repository: Option<String>,
    },
    /// No links and several known repositories; run the popularity tie-break.
    TieBreak,
}

impl Package {
    /// Creates a package and computes its verified links.
    pub fn new(
        package_name: impl Into<String>,
        extracted_links: BTreeSet<String>,
        known_repos: Vec<String>,
    ) -> Self {
        let known: HashSet<&str> = known_repos.iter().map(String::as_str).collect();
        let verified_links = extracted_links
            .iter()
            .filter(|link| known.contains(link.as_str()))
            .cloned()
            .collect();

        Self {
            package_name: package_name.into(),
            extracted_links,
            known_repos,
            verified_links,
        }
    }

    /// Package name.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Repository links found in the app details.
    pub fn extracted_links(&self) -> &BTreeSet<String> {
        &self.extracted_links
    }

    /// Repositories known to contain the package's manifest.
    pub fn known_repos(&self) -> &[String] {
        &self.known_repos
    }

    /// Extracted links that are also known repositories.
    pub fn verified_links(&self) -> &BTreeSet<String> {
        &self.verified_links
    }

    /// Returns true if exactly one distinct repository is known.
    pub fn has_unique_repo(&self) -> bool {
        let distinct: HashSet<&str> = self.known_repos.iter().map(String::as_str).collect();
        distinct.len() == 1
    }

    /// Applies the decision rules in order; the first that matches wins.
    pub fn decide(&self) -> Decision {
        let unique = self.has_unique_repo();

        if self.extracted_links.is_empty() && !unique {
            return Decision::TieBreak;
        }
        if self.verified_links.is_empty() && !unique {
            return resolved(MatchOutcome::NoRepo, None);
        }
        if self.verified_links.len() > 1 && !unique {
            return resolved(MatchOutcome::TooManyRepos, None);
        }

        if unique {
            resolved(MatchOutcome::UniqueRepo, self.known_repos.first().cloned())
        } else {
            resolved(MatchOutcome::Valid, self.verified_links.first().cloned())
        }
    }
}

fn resolved(outcome: MatchOutcome, repository: Option<String>) -> Decision {
    Decision::Resolved {
        outcome,
        repository,
    }
}
