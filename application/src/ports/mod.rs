//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod content_store;
pub mod store_error;
pub mod vote_ledger;
