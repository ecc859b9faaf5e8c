//! Repository metadata retrieval.
//!
//! [`RepoMetadataService`] looks up repositories by identifier, counts the
//! commits of their default branch with at most two requests, and runs code
//! searches scoped to one repository. All requests go through the
//! rate-governed [`GithubClient`].

mod error;
mod metadata;
mod record;
mod search;

pub use error::RepositoryError;
pub use metadata::RepositoryMetadata;
#[cfg(test)]
pub(crate) use metadata::fixtures;
pub use record::{RepositoryRecord, COLUMNS};
pub use search::CodeSearchHit;

use crate::host::{link_target, GithubClient, HostError, Transport};
use crate::identifier::RepositoryIdentifier;
use crate::rate_limit::{Clock, ResourceClass, SystemClock};
use search::{build_search_query, SearchItem, MAX_SEARCH_RESULTS, RESULTS_PER_PAGE};
use tracing::{debug, debug_span, info, warn, Instrument};
use url::form_urlencoded;

/// Commits requested per page when counting.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size the host accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Status the host uses when it rejects a request as unprocessable.
const UNPROCESSABLE: u16 = 422;

/// Status the host uses when listing commits of an empty repository.
const EMPTY_REPOSITORY: u16 = 409;

/// Fetches repository metadata through a rate-governed client.
pub struct RepoMetadataService<T, C = SystemClock> {
    client: GithubClient<T, C>,
    page_size: u32,
}

impl<T: Transport, C: Clock> RepoMetadataService<T, C> {
    /// Creates a service using the default page size.
    pub fn new(client: GithubClient<T, C>) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the page size used for commit listing, clamped to `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Returns the page size used for commit listing.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &GithubClient<T, C> {
        &self.client
    }

    /// Gets the repository identified by `identifier`.
    ///
    /// # Returns
    ///
    /// `None` if the host reports that the repository does not exist. The
    /// returned `full_name` is canonical and may differ from `identifier`
    /// if the repository was renamed or transferred.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidIdentifier`] for malformed input,
    /// [`RepositoryError::ValidationFailed`] if the host rejects the lookup,
    /// and any other host failure as is.
    pub async fn get_repo(
        &self,
        identifier: &str,
    ) -> Result<Option<RepositoryMetadata>, RepositoryError> {
        let repository: RepositoryIdentifier = identifier.parse()?;
        let url = format!("/repos/{}/{}", repository.owner(), repository.name());

        let document = match self.client.fetch_json(ResourceClass::Core, &url).await {
            Ok(Some(document)) => document,
            Ok(None) => return Ok(None),
            Err(error) => return Err(rejected(error, identifier, None)),
        };

        let metadata =
            RepositoryMetadata::from_document(document).map_err(|source| RepositoryError::Decode {
                identifier: identifier.to_string(),
                source,
            })?;

        if metadata.full_name != identifier {
            debug!(
                requested = identifier,
                canonical = %metadata.full_name,
                "Repository resolved under a different name"
            );
        }

        Ok(Some(metadata))
    }

    /// Counts commits on the default branch of `repo`.
    ///
    /// Requests the first page and reads the `last` pagination link. Without
    /// one, the first page is the only page. Otherwise the last page is
    /// fetched directly and the count is
    /// `page_size * (num_pages - 1) + items_on_last_page`. Never more than
    /// two requests.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ValidationFailed`] (with the canonical name
    /// set) if the host rejects the listing, [`RepositoryError::PageLink`] if
    /// the `last` link carries no usable page number, and any other host
    /// failure as is.
    pub async fn count_commits(&self, repo: &RepositoryMetadata) -> Result<u64, RepositoryError> {
        let span = debug_span!("count_commits", repo = %repo.full_name);

        async {
            let url = commits_url(&repo.full_name, repo.default_branch(), self.page_size);

            let first = match self.client.list_page(ResourceClass::Core, &url).await {
                Ok(page) => page,
                Err(error) if error.status() == Some(EMPTY_REPOSITORY) => {
                    debug!("Repository is empty");
                    return Ok(0);
                }
                Err(error) => {
                    return Err(rejected(error, &repo.full_name, Some(&repo.full_name)));
                }
            };

            let (last_link, num_pages) = match (&first.last, first.number_of_pages()) {
                (Some(link), Some(num_pages)) if num_pages > 1 => (link_target(link), num_pages),
                (Some(link), None) => {
                    return Err(RepositoryError::PageLink {
                        identifier: repo.full_name.clone(),
                        link: link_target(link),
                    });
                }
                _ => {
                    let count = first.items.len() as u64;
                    debug!(count, "Single page of commits");
                    return Ok(count);
                }
            };

            let last = self
                .client
                .list_page(ResourceClass::Core, &last_link)
                .await
                .map_err(|error| rejected(error, &repo.full_name, Some(&repo.full_name)))?;

            // A u32 page number times a page size of at most 100 fits in u64.
            let count =
                u64::from(self.page_size) * u64::from(num_pages - 1) + last.items.len() as u64;
            debug!(num_pages, count, "Counted commits");
            Ok(count)
        }
        .instrument(span)
        .await
    }

    /// Gets a repository together with its commit count.
    ///
    /// # Errors
    ///
    /// See [`get_repo`](Self::get_repo) and [`count_commits`](Self::count_commits).
    pub async fn get_repo_info(
        &self,
        identifier: &str,
    ) -> Result<Option<RepositoryMetadata>, RepositoryError> {
        let Some(mut repo) = self.get_repo(identifier).await? else {
            return Ok(None);
        };

        repo.commit_count = Some(self.count_commits(&repo).await?);
        Ok(Some(repo))
    }

    /// Searches `identifier` for files whose path contains any of `terms`.
    ///
    /// Follows `next` links until the host's result cap is reached.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::InvalidIdentifier`] for malformed input and
    /// any host failure as is.
    pub async fn search_code(
        &self,
        identifier: &str,
        terms: &[&str],
    ) -> Result<Vec<CodeSearchHit>, RepositoryError> {
        let repository: RepositoryIdentifier = identifier.parse()?;
        let query = build_search_query(&repository, terms);
        debug!(query = %query, "Executing code search");

        let mut url = format!(
            "/search/code?{}",
            form_urlencoded::Serializer::new(String::new())
                .append_pair("q", &query)
                .append_pair("per_page", &RESULTS_PER_PAGE.to_string())
                .finish()
        );
        let mut hits = Vec::new();

        loop {
            let mut page = self
                .client
                .list_page(ResourceClass::Search, &url)
                .await
                .map_err(|error| rejected(error, identifier, None))?;

            for item in page.take_items() {
                let item: SearchItem =
                    serde_json::from_value(item).map_err(|source| RepositoryError::Decode {
                        identifier: identifier.to_string(),
                        source,
                    })?;
                hits.push(CodeSearchHit::from(item));
            }

            if hits.len() >= MAX_SEARCH_RESULTS {
                warn!(
                    max = MAX_SEARCH_RESULTS,
                    "Reached maximum search results limit"
                );
                break;
            }

            match &page.next {
                Some(next) => url = link_target(next),
                None => break,
            }
        }

        info!(repo = identifier, count = hits.len(), "Code search complete");
        Ok(hits)
    }

    /// Returns paths of files in `identifier` that match `terms` and end with `suffix`.
    ///
    /// Code search matches terms anywhere in the path, so a file like
    /// `docs/settings.gradle/notes.txt` would otherwise be reported.
    ///
    /// # Errors
    ///
    /// See [`search_code`](Self::search_code).
    pub async fn find_files(
        &self,
        identifier: &str,
        suffix: &str,
        terms: &[&str],
    ) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .search_code(identifier, terms)
            .await?
            .into_iter()
            .filter(|hit| hit.path.ends_with(suffix))
            .map(|hit| hit.path)
            .collect())
    }
}

/// Builds the first-page URL for listing commits of `branch`.
fn commits_url(full_name: &str, branch: Option<&str>, per_page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(branch) = branch {
        query.append_pair("sha", branch);
    }
    query.append_pair("per_page", &per_page.to_string());

    format!("/repos/{full_name}/commits?{}", query.finish())
}

/// Maps a 422 to [`RepositoryError::ValidationFailed`], everything else to
/// [`RepositoryError::Host`].
fn rejected(error: HostError, identifier: &str, canonical: Option<&str>) -> RepositoryError {
    match error {
        HostError::Status {
            status: UNPROCESSABLE,
            message,
            ..
        } => RepositoryError::ValidationFailed {
            identifier: identifier.to_string(),
            canonical: canonical.map(str::to_string),
            message,
        },
        other => other.into(),
    }
}
