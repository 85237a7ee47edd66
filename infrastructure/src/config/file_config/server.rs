//! Server-side configuration from TOML (`[server]`, `[reconcile]`, `[logging]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw HTTP server configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub listen_addr: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Raw periodic reconciliation configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReconcileConfig {
    /// When set, `serve` sweeps all totals at this interval.
    pub interval_seconds: Option<u64>,
}

impl FileReconcileConfig {
    pub fn interval(&self) -> Option<Duration> {
        self.interval_seconds.map(Duration::from_secs)
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for a daily-rotated log file, in addition to stderr.
    pub directory: Option<PathBuf>,
}
