//! Tallies of package classifications.

use crate::matching::{MatchOutcome, PackageMatch};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of a matching run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    /// Number of packages classified.
    pub total: usize,

    /// Number of packages that resolved to a repository.
    pub resolved: usize,

    /// Number of packages per outcome. Every outcome is present.
    pub outcomes: BTreeMap<MatchOutcome, usize>,

    /// Repositories that more than one package resolved to.
    pub shared_repositories: BTreeMap<String, Vec<String>>,
}

impl Default for MatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: 0,
            resolved: 0,
            outcomes: MatchOutcome::ALL.iter().map(|outcome| (*outcome, 0)).collect(),
            shared_repositories: BTreeMap::new(),
        }
    }

    /// Builds a summary over all `matches`.
    #[must_use]
    pub fn from_matches(matches: &[PackageMatch]) -> Self {
        let mut summary = Self::new();
        for result in matches {
            summary.record(result);
        }
        summary.shared_repositories = Self::shared_repositories(matches);
        summary
    }

    /// Updates the counters with one classification.
    ///
    /// Does not touch [`shared_repositories`](Self::shared_repositories),
    /// which needs the full set of matches.
    pub fn record(&mut self, result: &PackageMatch) {
        self.total += 1;
        *self.outcomes.entry(result.outcome).or_insert(0) += 1;
        if result.repository.is_some() {
            self.resolved += 1;
        }
    }

    /// Returns how many packages got `outcome`.
    #[must_use]
    pub fn count(&self, outcome: MatchOutcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Groups packages by the repository they resolved to, keeping only
    /// repositories shared by more than one package.
    #[must_use]
    pub fn shared_repositories(matches: &[PackageMatch]) -> BTreeMap<String, Vec<String>> {
        let mut by_repository: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for result in matches {
            if let Some(repository) = &result.repository {
                by_repository
                    .entry(repository.clone())
                    .or_default()
                    .push(result.package_name.clone());
            }
        }
        by_repository.retain(|_, packages| packages.len() > 1);
        by_repository
    }
}
