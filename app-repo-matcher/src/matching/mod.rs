//! Matching of app packages to GitHub repositories.
//!
//! For each package, [`MatchingEngine::classify`] combines the repository
//! links found in the app details with the repositories known to contain the
//! package's manifest and returns a [`PackageMatch`]. Classification has no
//! side effects besides host lookups; tallying is left to
//! [`MatchSummary`](crate::summary::MatchSummary).

mod dedup;
mod error;
mod known;
mod outcome;
mod package;

pub use dedup::{deduplicate, narrow_by_popularity, Metric};
pub use error::MatchError;
pub use known::KnownRepos;
pub use outcome::{MatchOutcome, PackageMatch};
pub use package::{Decision, Package};

use crate::host::Transport;
use crate::links::LinkExtractor;
use crate::rate_limit::{Clock, SystemClock};
use crate::repository::{RepoMetadataService, RepositoryError};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

/// Classifies packages against the known package to repository mapping.
pub struct MatchingEngine<'a, T, C = SystemClock> {
    service: &'a RepoMetadataService<T, C>,
    known: &'a KnownRepos,
    extractor: LinkExtractor,
}

impl<'a, T: Transport, C: Clock> MatchingEngine<'a, T, C> {
    /// Creates an engine.
    pub fn new(
        service: &'a RepoMetadataService<T, C>,
        known: &'a KnownRepos,
        extractor: LinkExtractor,
    ) -> Self {
        Self {
            service,
            known,
            extractor,
        }
    }

    /// Classifies one package from its app details.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Lookup`] if the popularity tie-break hits a
    /// fatal host error.
    pub async fn classify(
        &self,
        package_name: &str,
        details: &Value,
    ) -> Result<PackageMatch, MatchError> {
        let span = info_span!("classify", package = package_name);

        async {
            let Some(known_repos) = self.known.get(package_name) else {
                debug!("Package is not in the known mapping");
                return Ok(PackageMatch::unresolved(package_name, MatchOutcome::Unknown));
            };

            let package = Package::new(
                package_name,
                self.extractor.extract(details),
                known_repos.to_vec(),
            );
            debug!(
                extracted = ?package.extracted_links(),
                known = ?package.known_repos(),
                verified = ?package.verified_links(),
                "Collected links"
            );

            let result = match package.decide() {
                Decision::Resolved {
                    outcome,
                    repository,
                } => PackageMatch {
                    package_name: package_name.to_string(),
                    outcome,
                    repository,
                },
                Decision::TieBreak => {
                    let winner = self
                        .deduplicate(package.known_repos())
                        .await
                        .map_err(|source| MatchError::Lookup {
                            package: package_name.to_string(),
                            source,
                        })?;

                    match winner {
                        Some(repository) => PackageMatch::resolved(
                            package_name,
                            MatchOutcome::NoGithubLinkButUniquePopular,
                            repository,
                        ),
                        None => PackageMatch::unresolved(package_name, MatchOutcome::NoGithubLink),
                    }
                }
            };

            debug!(
                outcome = %result.outcome,
                repository = result.repository.as_deref(),
                "Classified package"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Runs the popularity tie-break over `candidates`.
    ///
    /// # Errors
    ///
    /// See [`deduplicate`].
    pub async fn deduplicate(&self, candidates: &[String]) -> Result<Option<String>, RepositoryError> {
        deduplicate(self.service, candidates).await
    }
}
