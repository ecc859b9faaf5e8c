//! Popularity tie-break between candidate repositories.

use crate::host::Transport;
use crate::rate_limit::Clock;
use crate::repository::{RepoMetadataService, RepositoryError, RepositoryMetadata};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Popularity metrics used to break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Forks,
    Watchers,
    Subscribers,
}

impl Metric {
    /// Metrics in the order they are applied.
    pub const CASCADE: [Self; 3] = [Self::Forks, Self::Watchers, Self::Subscribers];

    /// Returns the value of this metric for `repo`.
    #[must_use]
    pub fn value(&self, repo: &RepositoryMetadata) -> u64 {
        match self {
            Self::Forks => repo.forks_count(),
            Self::Watchers => repo.watchers_count(),
            Self::Subscribers => repo.subscribers_count(),
        }
    }
}

/// Picks the single most popular non-fork repository among `candidates`.
///
/// A single distinct candidate is returned without any host call. Otherwise
/// every candidate is looked up; unresolvable ones are dropped, candidates
/// that resolve to the same canonical repository are collapsed (the first
/// one is kept), forks are removed, and [`narrow_by_popularity`] decides.
///
/// # Returns
///
/// The winning candidate exactly as it appears in `candidates`, or `None`
/// if nothing is left or the tie cannot be broken.
///
/// # Errors
///
/// Returns host failures other than not-found, invalid identifiers and
/// rejected lookups.
pub async fn deduplicate<T: Transport, C: Clock>(
    service: &RepoMetadataService<T, C>,
    candidates: &[String],
) -> Result<Option<String>, RepositoryError> {
    let mut seen_inputs = HashSet::new();
    let distinct: Vec<&String> = candidates
        .iter()
        .filter(|candidate| seen_inputs.insert(candidate.as_str()))
        .collect();

    if let [only] = distinct.as_slice() {
        return Ok(Some((*only).clone()));
    }

    let resolved = resolve_candidates(service, &distinct).await?;
    let non_forks: Vec<_> = resolved
        .into_iter()
        .filter(|(candidate, repo)| {
            if repo.is_fork() {
                debug!(candidate = %candidate, "Dropping fork");
            }
            !repo.is_fork()
        })
        .collect();

    Ok(narrow_by_popularity(non_forks))
}

async fn resolve_candidates<T: Transport, C: Clock>(
    service: &RepoMetadataService<T, C>,
    candidates: &[&String],
) -> Result<Vec<(String, RepositoryMetadata)>, RepositoryError> {
    let mut canonical_names = HashSet::new();
    let mut resolved = Vec::new();

    for candidate in candidates {
        match service.get_repo(candidate).await {
            Ok(Some(repo)) => {
                if canonical_names.insert(repo.full_name.clone()) {
                    resolved.push(((*candidate).clone(), repo));
                } else {
                    debug!(
                        candidate = %candidate,
                        canonical = %repo.full_name,
                        "Candidate resolves to an already seen repository"
                    );
                }
            }
            Ok(None) => warn!(candidate = %candidate, "Candidate repository not found"),
            Err(error @ RepositoryError::InvalidIdentifier(_)) => {
                warn!(error = %error, "Skipping invalid candidate");
            }
            Err(error @ RepositoryError::ValidationFailed { .. }) => {
                warn!(error = %error, "Skipping unresolvable candidate");
            }
            Err(error) => return Err(error),
        }
    }

    Ok(resolved)
}

/// Narrows candidates metric by metric until one is left.
///
/// For each metric in [`Metric::CASCADE`]: stop with the only candidate
/// left, or with `None` if none is left; otherwise keep the candidates
/// achieving the maximum. After the last metric exactly one candidate must
/// remain, otherwise the tie is irreducible and `None` is returned.
pub fn narrow_by_popularity(mut remaining: Vec<(String, RepositoryMetadata)>) -> Option<String> {
    for metric in Metric::CASCADE {
        match remaining.len() {
            0 => return None,
            1 => break,
            _ => {}
        }

        let best = remaining
            .iter()
            .map(|(_, repo)| metric.value(repo))
            .max()?;
        remaining.retain(|(_, repo)| metric.value(repo) == best);
        debug!(?metric, best, left = remaining.len(), "Applied tie-break metric");
    }

    if remaining.len() == 1 {
        remaining.pop().map(|(candidate, _)| candidate)
    } else {
        debug!(left = remaining.len(), "Tie could not be broken");
        None
    }
}
