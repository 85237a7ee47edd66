//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`RetryPolicy`]: bounded exponential backoff for transient store errors
//! - [`LedgerParams`]: retry policy plus the compare-and-swap conflict budget

pub mod ledger_params;
pub mod retry_policy;

pub use ledger_params::LedgerParams;
pub use retry_policy::RetryPolicy;
