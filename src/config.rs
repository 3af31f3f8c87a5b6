//! hwacc-bind Configuration
//!
//! The library search path comes from `LD_LIBRARY_PATH` or from an
//! `hwacc.toml` file:
//!
//! ```toml
//! search_path = ["/opt/esl/lib", "/usr/local/lib"]
//! entry_point = "hwacc_debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ffi::EntryPoint;

/// Environment variable holding the colon-separated search path
pub const SEARCH_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Config file name looked up by [`BindConfig::find_and_load`]
pub const CONFIG_FILENAME: &str = "hwacc.toml";

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings consumed by the registrar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BindConfig {
    /// Directories probed for the accelerator library, in order
    #[serde(default)]
    pub search_path: Vec<PathBuf>,

    /// Entry point every registered symbol is bound to
    #[serde(default)]
    pub entry_point: EntryPoint,
}

impl BindConfig {
    /// Read the search path from `LD_LIBRARY_PATH`.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_var(SEARCH_PATH_VAR)
    }

    /// Read the search path from the named environment variable.
    pub fn from_env_var(var: &str) -> ConfigResult<Self> {
        let value = std::env::var(var).map_err(|_| ConfigError::MissingSearchPath {
            var: var.to_string(),
        })?;
        Ok(Self::from_search_path(&value))
    }

    /// Parse a colon-separated list of directories. Order is kept and empty
    /// segments are dropped.
    pub fn from_search_path(value: &str) -> Self {
        Self {
            search_path: split_search_path(value),
            entry_point: EntryPoint::default(),
        }
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: BindConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find and load `hwacc.toml` by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Option<Self>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::load(&config_path).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    pub fn with_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.entry_point = entry_point;
        self
    }
}

fn split_search_path(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}
