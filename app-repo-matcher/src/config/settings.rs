//! Settings deserialization and validation.

use super::error::ConfigError;
use crate::links::{LinkExtractor, DEFAULT_LINK_PATTERN};
use crate::repository::DEFAULT_PAGE_SIZE;
use regex::Regex;
use serde::Deserialize;
use url::Url;

/// Largest page size the host accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Parsed contents of a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the GitHub API (defaults to the public API).
    pub api_base_url: Option<String>,

    /// Page size used when listing commits.
    pub page_size: u32,

    /// Pattern used to find repository links in app details.
    pub link_pattern: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            link_pattern: DEFAULT_LINK_PATTERN.to_string(),
        }
    }
}

impl Settings {
    /// Parses and validates settings from TOML text.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is invalid.
    pub fn from_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.to_string(),
            source: e,
        })?;
        settings.validate(path)?;
        Ok(settings)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.to_string(),
            message,
        };

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(invalid(format!(
                "page-size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if let Some(base) = &self.api_base_url {
            Url::parse(base).map_err(|e| invalid(format!("api-base-url '{base}': {e}")))?;
        }

        // Patterns without a group collect the whole match.
        Regex::new(&self.link_pattern)
            .map_err(|e| invalid(format!("link-pattern is not a valid regex: {e}")))?;

        Ok(())
    }

    /// Builds the link extractor for [`link_pattern`](Self::link_pattern).
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn link_extractor(&self) -> Result<LinkExtractor, ConfigError> {
        LinkExtractor::new(&self.link_pattern).map_err(|e| ConfigError::ValidationError {
            path: "link-pattern".to_string(),
            message: e.to_string(),
        })
    }
}
