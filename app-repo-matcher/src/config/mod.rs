//! Settings loading.
//!
//! Settings live in an optional TOML file with kebab-case keys:
//!
//! ```text
//! api-base-url = "https://github.example.com/api/v3/"
//! page-size = 100
//! link-pattern = 'github\.com/([A-Za-z0-9_-]+/[A-Za-z0-9_-]+)'
//! ```
//!
//! Every key is optional.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{Settings, MAX_PAGE_SIZE};

use std::path::Path;
use tracing::{debug, info};

/// Loads settings from `path`, or the defaults if `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, malformed, or holds
/// an invalid value.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        debug!("No settings file given, using defaults");
        return Ok(Settings::default());
    };

    info!(path = %path.display(), "Loading settings");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    Settings::from_toml(&content, &path.display().to_string())
}
