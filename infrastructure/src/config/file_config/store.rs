//! Store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which document store backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local; contents are lost at exit.
    Memory,
    /// JSON snapshot on disk, rewritten on every mutation.
    #[default]
    File,
}

/// Raw store configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    pub backend: StoreBackend,
    /// Snapshot location for the `file` backend.
    pub path: Option<PathBuf>,
}

impl FileStoreConfig {
    /// Configured path, or `<data dir>/vote-ledger/ledger.json`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("vote-ledger").join("ledger.json"))
            .unwrap_or_else(|| PathBuf::from("ledger.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_deserialize() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[store]
backend = "memory"
"#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_resolved_path() {
        let explicit = FileStoreConfig {
            backend: StoreBackend::File,
            path: Some(PathBuf::from("/tmp/votes.json")),
        };
        assert_eq!(explicit.resolved_path(), PathBuf::from("/tmp/votes.json"));

        let default = FileStoreConfig::default().resolved_path();
        assert!(default.ends_with("ledger.json"));
    }
}
