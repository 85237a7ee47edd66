//! Infrastructure layer for vote-ledger
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileOutputConfig, FileStoreConfig, StoreBackend};
pub use store::{DocumentStore, ImportSummary, SeedData};
