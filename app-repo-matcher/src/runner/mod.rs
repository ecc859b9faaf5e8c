//! Orchestrates matching and repository data download runs.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::host::{GithubClient, OctocrabTransport, Transport};
use crate::links::LinkExtractor;
use crate::matching::{KnownRepos, MatchingEngine, PackageMatch};
use crate::rate_limit::{Clock, SystemClock};
use crate::repository::{RepoMetadataService, RepositoryError, RepositoryRecord, COLUMNS};
use crate::summary::{MatchSummary, RepoDataSummary, SkipReason};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, info_span, warn, Instrument};

/// One row of the match output.
#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    package_name: &'a str,
    repository: &'a str,
}

/// Drives whole runs over files.
pub struct Runner<T, C = SystemClock> {
    service: RepoMetadataService<T, C>,
    extractor: LinkExtractor,
}

impl Runner<OctocrabTransport> {
    /// Builds a runner talking to GitHub from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let settings = config.settings();
        let transport =
            OctocrabTransport::build(config.token(), settings.api_base_url.as_deref())?;
        let service = RepoMetadataService::new(GithubClient::new(transport))
            .with_page_size(settings.page_size);

        Ok(Self::with_service(service, settings.link_extractor()?))
    }
}

impl<T: Transport, C: Clock> Runner<T, C> {
    /// Creates a runner over an existing service.
    pub fn with_service(service: RepoMetadataService<T, C>, extractor: LinkExtractor) -> Self {
        Self { service, extractor }
    }

    /// Returns the repository service.
    pub fn service(&self) -> &RepoMetadataService<T, C> {
        &self.service
    }

    /// Classifies every package in `details_dir` and writes the resolved ones.
    ///
    /// `known_csv` maps packages to the repositories known to contain them.
    /// `details_dir` holds one `<package>.json` app details file per package.
    /// Resolved matches are written to `out_csv` as header-less
    /// `package_name,repository` rows, the input format of
    /// [`download_repo_data`](Self::download_repo_data).
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read, the output cannot be
    /// written, or a host lookup fails fatally.
    pub async fn match_packages(
        &self,
        known_csv: &Path,
        details_dir: &Path,
        out_csv: &Path,
    ) -> Result<MatchSummary, RunnerError> {
        let span = info_span!("match_packages", details = %details_dir.display());

        async {
            let known = load_known_repos(known_csv)?;
            info!(count = known.len(), "Loaded known repositories");

            let packages = load_package_details(details_dir)?;
            info!(count = packages.len(), "Loaded app details");

            let engine = MatchingEngine::new(&self.service, &known, self.extractor.clone());
            let mut matches: Vec<PackageMatch> = Vec::with_capacity(packages.len());
            for (package_name, details) in &packages {
                matches.push(engine.classify(package_name, details).await?);
            }

            write_matches(out_csv, &matches)?;

            let summary = MatchSummary::from_matches(&matches);
            info!(
                total = summary.total,
                resolved = summary.resolved,
                shared = summary.shared_repositories.len(),
                "Matching complete"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Downloads metadata and commit counts for every listed repository.
    ///
    /// `package_csv` has no header; each row is `package,repository`. Rows
    /// that are too short, hold an invalid identifier, or name a repository
    /// that cannot be found are skipped with a warning. `out_csv` always
    /// starts with the [`COLUMNS`] header.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or written, or a host
    /// request fails fatally.
    pub async fn download_repo_data(
        &self,
        package_csv: &Path,
        out_csv: &Path,
    ) -> Result<RepoDataSummary, RunnerError> {
        let span = info_span!("download_repo_data", input = %package_csv.display());

        async {
            let csv_error = |path: &Path| {
                let path = path.display().to_string();
                move |source| RunnerError::Csv { path, source }
            };

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(package_csv)
                .map_err(csv_error(package_csv))?;
            // The header goes out even if every row ends up skipped.
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(out_csv)
                .map_err(csv_error(out_csv))?;
            writer.write_record(COLUMNS).map_err(csv_error(out_csv))?;
            let mut summary = RepoDataSummary::new();

            for (index, row) in reader.records().enumerate() {
                let row = row.map_err(csv_error(package_csv))?;
                let (Some(package), Some(repository)) = (row.get(0), row.get(1)) else {
                    warn!(row = index + 1, "Skipping row without a repository column");
                    summary.record_skipped(SkipReason::MalformedRow);
                    continue;
                };
                let repository = repository.trim();

                match self.service.get_repo_info(repository).await {
                    Ok(Some(metadata)) => {
                        debug!(package, repository = %metadata.full_name, "Writing repository record");
                        writer
                            .serialize(RepositoryRecord::from(&metadata))
                            .map_err(csv_error(out_csv))?;
                        summary.record_written();
                    }
                    Ok(None) => {
                        warn!(package, repository, "Repository not found");
                        summary.record_skipped(SkipReason::NotFound);
                    }
                    Err(error @ RepositoryError::InvalidIdentifier(_)) => {
                        warn!(package, error = %error, "Skipping invalid repository");
                        summary.record_skipped(SkipReason::InvalidIdentifier);
                    }
                    Err(error @ RepositoryError::ValidationFailed { .. }) => {
                        warn!(package, error = %error, "Skipping rejected repository");
                        summary.record_skipped(SkipReason::Rejected);
                    }
                    Err(error) => return Err(error.into()),
                }
            }

            writer.flush().map_err(|source| RunnerError::Io {
                path: out_csv.display().to_string(),
                source,
            })?;

            info!(
                rows = summary.rows,
                written = summary.written,
                skipped = summary.skipped(),
                "Download complete"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }
}

/// Loads the known package to repository mapping from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn load_known_repos(path: &Path) -> Result<KnownRepos, RunnerError> {
    let file = File::open(path).map_err(|source| RunnerError::Io {
        path: path.display().to_string(),
        source,
    })?;

    KnownRepos::from_csv(file).map_err(|source| RunnerError::Csv {
        path: path.display().to_string(),
        source,
    })
}

/// Loads every `*.json` file in `dir` as `(package_name, details)`.
///
/// The package name is the file stem. Results are sorted by package name.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be read, or a file is
/// not valid JSON.
pub fn load_package_details(dir: &Path) -> Result<Vec<(String, Value)>, RunnerError> {
    let io_error = |path: &Path| {
        let path = path.display().to_string();
        move |source| RunnerError::Io { path, source }
    };

    let mut packages = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(package_name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(path = %path.display(), "Skipping file with a non UTF-8 name");
            continue;
        };

        let content = std::fs::read_to_string(&path).map_err(io_error(&path))?;
        let details = serde_json::from_str(&content).map_err(|source| RunnerError::Json {
            path: path.display().to_string(),
            source,
        })?;
        packages.push((package_name.to_string(), details));
    }

    packages.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(packages)
}

fn write_matches(path: &Path, matches: &[PackageMatch]) -> Result<(), RunnerError> {
    let csv_error = |source| RunnerError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;
    for result in matches {
        if let Some(repository) = &result.repository {
            writer
                .serialize(MatchRow {
                    package_name: &result.package_name,
                    repository,
                })
                .map_err(csv_error)?;
        }
    }

    writer.flush().map_err(|source| RunnerError::Io {
        path: path.display().to_string(),
        source,
    })
}
