//! Rate limit resource classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A quota bucket with its own independent rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    /// Repository, commit and most other REST endpoints.
    Core,
    /// Search endpoints.
    Search,
    /// GraphQL endpoint.
    Graphql,
}

impl ResourceClass {
    /// All resource classes, in the order the host lists them.
    pub const ALL: [Self; 3] = [Self::Core, Self::Search, Self::Graphql];

    /// Returns the name the host uses for this class.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Search => "search",
            Self::Graphql => "graphql",
        }
    }

    /// Parses the value of an `X-RateLimit-Resource` header.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
