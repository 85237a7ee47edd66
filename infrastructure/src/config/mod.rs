//! Configuration file loading for vote-ledger
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `VOTE_LEDGER_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./vote-ledger.toml` or `./.vote-ledger.toml`
//! 4. Global: `$XDG_CONFIG_HOME/vote-ledger/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileLedgerConfig, FileLoggingConfig, FileOutputConfig, FileReconcileConfig,
    FileRetryConfig, FileServerConfig, FileStoreConfig, StoreBackend,
};
pub use loader::ConfigLoader;
