//! Config loading and persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Result;

/// Engine configuration, persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vendor whose offer populates the index document's top-level
    /// price/priority/stock fields. Agreed upon externally.
    pub preferred_vendor: String,
    pub sync: IndexSyncConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred_vendor: "spartangeek".to_string(),
            sync: IndexSyncConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Retry/backoff knobs for the background index sync worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSyncConfig {
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub max_attempts: u32,
    /// Wall-clock budget for a single job, retries included.
    pub job_deadline_ms: u64,
}

impl Default for IndexSyncConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 250,
            backoff_max_ms: 8_000,
            max_attempts: 5,
            job_deadline_ms: 30_000,
        }
    }
}

impl IndexSyncConfig {
    /// Millisecond-scale backoff so worker tests finish quickly.
    pub fn fast_for_tests() -> Self {
        Self {
            backoff_base_ms: 1,
            backoff_max_ms: 4,
            max_attempts: 4,
            job_deadline_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub stdout: bool,
    pub stdout_format: LogFormat,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            stdout_format: LogFormat::Compact,
            file: FileLoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    /// Log directory; defaults to the XDG data dir when unset.
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub rotation: LogRotation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Config file read/parse/write failure.
#[derive(Debug, Error, Clone)]
#[error("config error: {reason}")]
pub struct ConfigError {
    pub reason: String,
}

impl ConfigError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub fn config_path() -> PathBuf {
    crate::paths::config_dir().join("config.toml")
}

pub fn load() -> Result<Config> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::new(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&contents)
        .map_err(|e| ConfigError::new(format!("failed to parse {}: {e}", path.display())))
        .map_err(Into::into)
}

/// Load the config, falling back to (and persisting) defaults.
pub fn load_or_init() -> Config {
    let path = config_path();
    if path.exists() {
        match load_from(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                tracing::warn!("config load failed, using defaults: {e}");
                return Config::default();
            }
        }
    }

    let cfg = Config::default();
    if let Err(e) = write_config(&path, &cfg) {
        tracing::warn!("failed to write default config: {e}");
    }
    cfg
}

pub fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| ConfigError::new(format!("failed to create {}: {e}", dir.display())))?;
    }
    let contents = toml::to_string_pretty(cfg)
        .map_err(|e| ConfigError::new(format!("failed to render config: {e}")))?;
    atomic_write(path, contents.as_bytes())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| ConfigError::new("config path missing parent directory"))?;
    let temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        ConfigError::new(format!(
            "failed to create temp file in {}: {e}",
            dir.display()
        ))
    })?;
    fs::write(temp.path(), data)
        .map_err(|e| ConfigError::new(format!("failed to write config temp file: {e}")))?;
    temp.persist(path).map_err(|e| {
        ConfigError::new(format!(
            "failed to persist config to {}: {e}",
            path.display()
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_roundtrip_through_toml() {
        let cfg = Config::default();
        let rendered = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.preferred_vendor, "spartangeek");
        assert_eq!(parsed.sync.max_attempts, 5);
        assert_eq!(parsed.logging.stdout_format, LogFormat::Compact);
    }

    #[test]
    fn write_then_load_preserves_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.preferred_vendor = "newegg".to_string();
        cfg.sync.backoff_base_ms = 10;
        write_config(&path, &cfg).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.preferred_vendor, "newegg");
        assert_eq!(loaded.sync.backoff_base_ms, 10);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: Config = toml::from_str("preferred_vendor = \"amazon-mx\"\n").unwrap();
        assert_eq!(cfg.preferred_vendor, "amazon-mx");
        assert_eq!(cfg.sync.job_deadline_ms, 30_000);
        assert!(cfg.logging.stdout);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
