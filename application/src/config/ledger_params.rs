//! Ledger parameters: use case loop control.
//!
//! [`LedgerParams`] groups the static parameters that bound how hard the
//! use cases try before reporting the service as unavailable.

use super::retry_policy::RetryPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Applied to each store call.
    pub retry: RetryPolicy,
    /// Maximum re-reads after a lost compare-and-swap before giving up.
    pub max_conflict_retries: usize,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_conflict_retries: 16,
        }
    }
}

impl LedgerParams {
    // ==================== Builder Methods ====================

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_conflict_retries(mut self, max: usize) -> Self {
        self.max_conflict_retries = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = LedgerParams::default();
        assert_eq!(params.max_conflict_retries, 16);
        assert_eq!(params.retry.max_attempts, 4);
    }

    #[test]
    fn test_builder() {
        let params = LedgerParams::default()
            .with_retry(RetryPolicy::none())
            .with_max_conflict_retries(2);

        assert_eq!(params.retry.max_attempts, 1);
        assert_eq!(params.max_conflict_retries, 2);
    }
}
