//! XDG directory helpers for config/log locations.

use std::path::PathBuf;

/// Base directory for configuration files.
///
/// Uses `OB_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/offerbook` or
/// `~/.config/offerbook`.
pub(crate) fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OB_CONFIG_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("offerbook")
}

/// Base directory for persistent data (logs, caches).
///
/// Uses `OB_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/offerbook` or
/// `~/.local/share/offerbook`.
pub(crate) fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OB_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local")
                .join("share")
        })
        .join("offerbook")
}

pub(crate) fn log_dir() -> PathBuf {
    data_dir().join("logs")
}
