use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::config::Config;

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "crmboard.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read and parse one config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolve the config for a run.
///
/// An explicit path must exist. Otherwise `crmboard.toml` in `cwd` is used
/// when present, and built-in defaults when not.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return read_config(path);
    }
    let path = cwd.join(CONFIG_FILE);
    if path.is_file() {
        debug!(path = %path.display(), "loading config");
        read_config(&path)
    } else {
        Ok(Config::default())
    }
}
