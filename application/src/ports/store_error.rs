//! Errors surfaced by store adapters.

use thiserror::Error;

/// Errors that can occur while talking to the durable store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store request timed out: {0}")]
    Timeout(String),

    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store I/O error: {0}")]
    Io(String),

    #[error("Store is closed")]
    Closed,

    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Timeout(_) | StoreError::Connection(_) | StoreError::Io(_)
        )
    }

    /// Whether the caller should see this as "try again later" rather
    /// than an internal fault.
    pub fn is_unavailable(&self) -> bool {
        self.is_transient() || matches!(self, StoreError::Closed)
    }
}
