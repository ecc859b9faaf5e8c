//! Repository identifiers in `owner/name` form.
//!
//! Identifiers are only checked for syntax. Two identifiers that differ in
//! case or that name a renamed repository are not unified here; the host's
//! canonical `full_name` is the source of truth for that.

mod error;

pub use error::IdentifierError;

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static FULL_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9-]+)/([a-z0-9_.-]+)$").expect("full name pattern is valid")
});

/// A syntactically valid GitHub repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryIdentifier {
    owner: String,
    name: String,
}

impl RepositoryIdentifier {
    /// Builds an identifier from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Invalid`] if either part contains characters
    /// GitHub does not allow.
    pub fn new(owner: &str, name: &str) -> Result<Self, IdentifierError> {
        format!("{owner}/{name}").parse()
    }

    /// Repository owner (user or organization login).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identifier in `owner/name` format.
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

impl FromStr for RepositoryIdentifier {
    type Err = IdentifierError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let captures = FULL_NAME_PATTERN
            .captures(input)
            .ok_or_else(|| IdentifierError::Invalid {
                input: input.to_string(),
            })?;

        Ok(Self {
            owner: captures[1].to_string(),
            name: captures[2].to_string(),
        })
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Serialize for RepositoryIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
