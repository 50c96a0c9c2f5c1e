use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::model::config::LogConfig;

/// Filter directive for a run: `-v` raises the configured level
pub fn filter_directive(config: &LogConfig, verbose: u8) -> String {
    match verbose {
        0 => config.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Where the board UI writes its log
pub fn log_file_path(config: &LogConfig) -> PathBuf {
    config
        .file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("crmboard.log"))
}

fn env_filter(config: &LogConfig, verbose: u8) -> EnvFilter {
    // RUST_LOG wins unless -v was passed
    if verbose == 0
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::try_new(filter_directive(config, verbose)).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr, for one-shot CLI commands
pub fn init_stderr(config: &LogConfig, verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to a file, for the board UI (stderr belongs to the terminal).
/// Falls back to discarding output if the file cannot be opened.
pub fn init_file(config: &LogConfig, verbose: u8) {
    let path = log_file_path(config);
    let filter = env_filter(config, verbose);
    match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .try_init();
        }
    }
}
