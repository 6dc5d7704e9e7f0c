use std::fs;
use std::path::PathBuf;

use crate::io::store_io::{StoreError, StorePaths};
use crate::model::config::TrackerConfig;

/// Name of the data directory under $HOME when none is given
pub const DEFAULT_DIR_NAME: &str = ".task-tracker";

/// Resolve the data directory: an explicit directory wins, otherwise
/// `$HOME/.task-tracker`.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(dir) => PathBuf::from(dir),
        None => dirs_home().join(DEFAULT_DIR_NAME),
    }
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read config.toml. A missing file yields the defaults.
pub fn read_config(paths: &StorePaths) -> Result<TrackerConfig, StoreError> {
    let path = &paths.config;
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text)
}

/// Parse and validate config text
pub fn parse_config(text: &str) -> Result<TrackerConfig, StoreError> {
    let config: TrackerConfig = toml::from_str(text)?;
    // Room for at least one character before the "..." marker
    if config.display.note_width < 4 {
        return Err(StoreError::InvalidConfig(format!(
            "display.note_width must be at least 4 (got {})",
            config.display.note_width
        )));
    }
    Ok(config)
}
