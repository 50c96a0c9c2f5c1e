use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration from crmboard.toml. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mention: MentionConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Record endpoint prefix; `/{model}/{id}` is appended
    #[serde(default = "default_record_path")]
    pub record_path: String,
    /// Suggestion endpoint; `?q={query}` is appended
    #[serde(default = "default_users_path")]
    pub users_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            status_path: default_status_path(),
            record_path: default_record_path(),
            users_path: default_users_path(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_status_path() -> String {
    "/api/update_status".to_string()
}

fn default_record_path() -> String {
    "/api/record".to_string()
}

fn default_users_path() -> String {
    "/api/users".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionConfig {
    #[serde(default = "default_trigger")]
    pub trigger: char,
    /// Queries shorter than this are not sent
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// How long the dropdown survives a blur, so a pointer-down pick can land
    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,
    /// Dropdown rows shown before scrolling
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

impl Default for MentionConfig {
    fn default() -> Self {
        MentionConfig {
            trigger: default_trigger(),
            min_query_len: default_min_query_len(),
            blur_grace_ms: default_blur_grace_ms(),
            max_visible: default_max_visible(),
        }
    }
}

impl MentionConfig {
    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }
}

fn default_trigger() -> char {
    '@'
}

fn default_min_query_len() -> usize {
    1
}

fn default_blur_grace_ms() -> u64 {
    150
}

fn default_max_visible() -> usize {
    8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailConfig {
    /// Fields whose name starts with this are framework-private and never shown
    #[serde(default = "default_private_prefix")]
    pub private_prefix: String,
}

impl Default for DetailConfig {
    fn default() -> Self {
        DetailConfig {
            private_prefix: default_private_prefix(),
        }
    }
}

fn default_private_prefix() -> String {
    "_".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Theme color overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file for the board UI (defaults to crmboard.log in the temp dir)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
