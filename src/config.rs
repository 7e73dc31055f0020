use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_FREQUENCY, DEFAULT_GUIDE_NAME, DEFAULT_LOG_FILE};
use crate::error::{Result, ZipCleanError};

/// Run settings, read from `zipclean.toml` and overridden by CLI flags
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub guide_name: String,
    pub frequency: usize,
    pub log_file: PathBuf,
    pub debug: bool,
    /// Reference zip codes on disk; the bundled database is used when unset
    pub zip_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guide_name: DEFAULT_GUIDE_NAME.to_string(),
            frequency: DEFAULT_FREQUENCY,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
            zip_file: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from `./zipclean.toml` when it exists.
    /// Falls back to defaults when neither is available.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ZipCleanError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frequency == 0 {
            return Err(ZipCleanError::InvalidThreshold(self.frequency));
        }
        if self.guide_name.trim().is_empty() {
            return Err(ZipCleanError::Config("guide name must not be empty".to_string()));
        }
        Ok(())
    }
}
