//! Runner configuration.

use crate::config::Settings;

/// Configuration for a matching or download run.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: Option<String>,
    /// Settings loaded from the settings file.
    settings: Settings,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(token: Option<String>, settings: Settings) -> Self {
        Self { token, settings }
    }

    /// Returns the configured GitHub token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
