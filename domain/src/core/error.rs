//! Domain error types

use crate::core::ids::AnswerId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid vote value: {0} (expected +1 or -1)")]
    InvalidVoteValue(i64),

    #[error("Unknown item kind: '{0}' (expected 'question' or 'answer')")]
    UnknownItemKind(String),

    #[error("Answer {answer} does not belong to this question")]
    ForeignAnswer { answer: AnswerId },
}

impl DomainError {
    /// Check if this error was caused by malformed caller input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidVoteValue(_) | DomainError::UnknownItemKind(_)
        )
    }
}
