//! Run summary types and helpers.

mod match_summary;
mod repo_data;

pub use match_summary::MatchSummary;
pub use repo_data::{RepoDataSummary, SkipReason};
