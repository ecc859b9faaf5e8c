//! Tallies of a repository data download.

use serde::Serialize;

/// Why a package list row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The row has fewer than two columns.
    MalformedRow,
    /// The repository column is not an `owner/name` identifier.
    InvalidIdentifier,
    /// The host does not know the repository.
    NotFound,
    /// The host rejected the lookup.
    Rejected,
}

/// Summary of a repository data download.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoDataSummary {
    /// Number of rows read.
    pub rows: usize,
    /// Number of records written.
    pub written: usize,
    /// Rows skipped because they were malformed.
    pub malformed_rows: usize,
    /// Rows skipped because of an invalid identifier.
    pub invalid_identifiers: usize,
    /// Rows skipped because the repository does not exist.
    pub not_found: usize,
    /// Rows skipped because the host rejected the lookup.
    pub rejected: usize,
}

impl RepoDataSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a written record.
    pub fn record_written(&mut self) {
        self.rows += 1;
        self.written += 1;
    }

    /// Counts a skipped row.
    pub fn record_skipped(&mut self, reason: SkipReason) {
        self.rows += 1;
        match reason {
            SkipReason::MalformedRow => self.malformed_rows += 1,
            SkipReason::InvalidIdentifier => self.invalid_identifiers += 1,
            SkipReason::NotFound => self.not_found += 1,
            SkipReason::Rejected => self.rejected += 1,
        }
    }

    /// Number of rows that produced no record.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.rows - self.written
    }
}
