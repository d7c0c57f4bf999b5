use std::path::Path;

use serde::{Deserialize, Serialize};

/// Runtime configuration for a tracking run.
///
/// Loaded from a small TOML file; every field has a default so an absent or
/// empty file behaves sensibly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The label text that marks a change as missing a forward port.
    label: String,

    /// Character budget for truncated diagnostic listings (e.g. the names
    /// of content items a change removes).
    diagnostic_budget: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label: "forward port missing".to_string(),
            diagnostic_budget: 120,
        }
    }
}

/// Errors that can occur when loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The label text that marks a change as missing a forward port.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Character budget for truncated diagnostic listings.
    #[must_use]
    pub const fn diagnostic_budget(&self) -> usize {
        self.diagnostic_budget
    }
}
