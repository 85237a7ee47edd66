//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod output;
mod retry;
mod server;
mod store;

pub use output::FileOutputConfig;
pub use retry::{FileLedgerConfig, FileRetryConfig};
pub use server::{FileLoggingConfig, FileReconcileConfig, FileServerConfig};
pub use store::{FileStoreConfig, StoreBackend};

use ledger_application::LedgerParams;
use ledger_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Document store backend and location
    pub store: FileStoreConfig,
    /// Backoff for transient store failures
    pub retry: FileRetryConfig,
    /// Compare-and-swap conflict budget
    pub ledger: FileLedgerConfig,
    /// HTTP listener
    pub server: FileServerConfig,
    /// Periodic total reconciliation
    pub reconcile: FileReconcileConfig,
    /// Log file output
    pub logging: FileLoggingConfig,
    /// CLI output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.retry.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                zero("retry.max_attempts"),
                "retry.max_attempts must be at least 1",
            ));
        }
        if self.retry.multiplier <= 0.0 || !self.retry.multiplier.is_finite() {
            issues.push(ConfigIssue::error(
                zero("retry.multiplier"),
                format!("retry.multiplier must be positive, got {}", self.retry.multiplier),
            ));
        } else if self.retry.multiplier < 1.0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidValue {
                    field: "retry.multiplier".to_string(),
                    value: self.retry.multiplier.to_string(),
                },
                "retry.multiplier below 1.0 is treated as 1.0 (constant backoff)",
            ));
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::BackoffInverted,
                format!(
                    "retry.initial_backoff_ms ({}) exceeds retry.max_backoff_ms ({}); every wait is capped at the maximum",
                    self.retry.initial_backoff_ms, self.retry.max_backoff_ms
                ),
            ));
        }

        if let Some(path) = &self.store.path
            && path.as_os_str().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "store.path".to_string(),
                    value: String::new(),
                },
                "store.path cannot be empty",
            ));
        }

        if self.server.listen_addr.parse::<SocketAddr>().is_err() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "server.listen_addr".to_string(),
                    value: self.server.listen_addr.clone(),
                },
                format!(
                    "server.listen_addr: '{}' is not a socket address",
                    self.server.listen_addr
                ),
            ));
        }

        if self.reconcile.interval_seconds == Some(0) {
            issues.push(ConfigIssue::error(
                zero("reconcile.interval_seconds"),
                "reconcile.interval_seconds must be at least 1 (omit it to disable)",
            ));
        }

        issues
    }

    /// Use case parameters from the `[retry]` and `[ledger]` sections.
    pub fn ledger_params(&self) -> LedgerParams {
        LedgerParams::default()
            .with_retry(self.retry.to_retry_policy())
            .with_max_conflict_retries(self.ledger.max_conflict_retries)
    }
}

fn zero(field: &str) -> ConfigIssueCode {
    ConfigIssueCode::ZeroValue {
        field: field.to_string(),
    }
}
