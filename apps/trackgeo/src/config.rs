//! # Configuration
//!
//! Optional TOML file holding traversal limits:
//!
//! ```toml
//! [limits]
//! max_hops = 1000
//! max_results = 10000
//! ```
//!
//! The file comes from `--config`, else from `TRACKGEO_CONFIG`. Missing keys
//! keep their defaults; command-line overrides win over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trackgeo_core::{SearchLimits, TrackError};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "TRACKGEO_CONFIG";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub limits: SearchLimits,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, TrackError> {
        toml::from_str(text)
            .map_err(|e| TrackError::DeserializationError(format!("Invalid config: {e}")))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            TrackError::IoError(format!("Cannot read config '{}': {e}", path.display()))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(TrackError::IoError(format!(
                "Config '{}' exceeds {MAX_CONFIG_FILE_SIZE} bytes",
                path.display()
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            TrackError::IoError(format!("Cannot read config '{}': {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Load from an explicit path, else from `TRACKGEO_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, TrackError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Limits after command-line overrides.
    #[must_use]
    pub fn limits_with(&self, max_hops: Option<usize>, max_results: Option<usize>) -> SearchLimits {
        SearchLimits {
            max_hops: max_hops.unwrap_or(self.limits.max_hops),
            max_results: max_results.unwrap_or(self.limits.max_results),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = Config::from_toml("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.limits, SearchLimits::default());
    }

    #[test]
    fn partial_limits_table() {
        let config = Config::from_toml("[limits]\nmax_hops = 12\n").expect("parse");
        assert_eq!(config.limits.max_hops, 12);
        assert_eq!(
            config.limits.max_results,
            SearchLimits::default().max_results
        );
    }

    #[test]
    fn unknown_sections_rejected() {
        assert!(Config::from_toml("[server]\nport = 1\n").is_err());
        assert!(Config::from_toml("[limits\n").is_err());
    }

    #[test]
    fn overrides_win() {
        let config = Config::from_toml("[limits]\nmax_hops = 12\nmax_results = 7\n").expect("parse");
        let limits = config.limits_with(Some(3), None);
        assert_eq!(limits.max_hops, 3);
        assert_eq!(limits.max_results, 7);
    }
}
