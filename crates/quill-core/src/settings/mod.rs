//! Bot settings
//!
//! Loaded once at startup: built-in defaults, then the settings file, then
//! environment overrides, in increasing priority.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuillError, QuillResult};

/// Environment variable overriding the bot account id
const ENV_ACCOUNT_ID: &str = "QUILL_ACCOUNT_ID";

/// Environment variable overriding the bot account name
const ENV_ACCOUNT_NAME: &str = "QUILL_ACCOUNT_NAME";

/// Bot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Numeric id of the bot account
    #[serde(default = "default_account_id")]
    pub account_id: u64,

    /// Display name of the bot account
    #[serde(default = "default_account_name")]
    pub account_name: String,

    /// Account ids allowed by the `bot_operator` checker
    #[serde(default)]
    pub operators: Vec<u64>,
}

fn default_account_id() -> u64 {
    1
}

fn default_account_name() -> String {
    "quill".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            account_id: default_account_id(),
            account_name: default_account_name(),
            operators: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from the default locations plus environment overrides
    ///
    /// Looks for `quill.toml` in the working directory, then under the user
    /// config directory. A missing file is not an error; defaults apply.
    pub fn load() -> QuillResult<Self> {
        let mut settings = Self::default();

        for path in Self::default_locations() {
            if path.exists() {
                debug!(path = %path.display(), "loading settings file");
                settings = Self::from_file(&path)?;
                break;
            }
        }

        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a specific TOML file, then apply env overrides
    pub fn from_path(path: impl AsRef<Path>) -> QuillResult<Self> {
        let mut settings = Self::from_file(path.as_ref())?;
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> QuillResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from("quill.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("quill").join("quill.toml"));
        }
        locations
    }

    fn apply_env_overrides(&mut self) -> QuillResult<()> {
        if let Ok(raw) = std::env::var(ENV_ACCOUNT_ID) {
            self.account_id = raw.parse().map_err(|_| {
                QuillError::config(format!("{ENV_ACCOUNT_ID} must be a numeric account id"))
            })?;
        }
        if let Ok(name) = std::env::var(ENV_ACCOUNT_NAME) {
            self.account_name = name;
        }
        Ok(())
    }

    fn validate(&self) -> QuillResult<()> {
        if self.account_id == 0 {
            return Err(QuillError::config("account_id must be non-zero"));
        }
        if self.account_name.is_empty() {
            return Err(QuillError::config("account_name must not be empty"));
        }
        Ok(())
    }
}
