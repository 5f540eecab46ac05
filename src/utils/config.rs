use super::changelog::{ParseMode, ValidationOptions};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "changelog-lint.toml";

/// main configuration for changelog-lint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LintConfig {
    /// how forgiving the parser is
    pub mode: ParseMode,

    /// validation rule toggles
    pub validation: ValidationOptions,
}

impl LintConfig {
    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: LintConfig = toml::from_str(&contents).map_err(|e| Error::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// find and load the configuration file in `dir`
    ///
    /// returns the default config if the file is missing or cannot be parsed
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Self {
        match Self::find_config_file(&dir) {
            Some(config_path) => Self::load_from_file(&config_path).unwrap_or_else(|e| {
                warn!("ignoring configuration: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// find the configuration file in `dir`
    pub fn find_config_file<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        let config_path = dir.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }
}
