#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod host;
pub mod identifier;
pub mod links;
pub mod matching;
pub mod rate_limit;
pub mod repository;
pub mod runner;
pub mod summary;

pub use config::{load_settings, ConfigError, Settings};
pub use host::{GithubClient, HostError, OctocrabTransport, Transport};
pub use identifier::{IdentifierError, RepositoryIdentifier};
pub use links::{LinkExtractor, DEFAULT_LINK_PATTERN};
pub use matching::{KnownRepos, MatchError, MatchOutcome, MatchingEngine, PackageMatch};
pub use rate_limit::{Clock, RateLimitInfo, ResourceClass, SystemClock};
pub use repository::{RepoMetadataService, RepositoryError, RepositoryMetadata, RepositoryRecord};
pub use runner::{load_known_repos, load_package_details, Runner, RunnerConfig, RunnerError};
pub use summary::{MatchSummary, RepoDataSummary};
