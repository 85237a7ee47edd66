//! Domain layer for vote-ledger
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Vote Ledger
//!
//! - **Ledger**: one [`VoteRecord`] per `(user, item)` pair, never an append-only log
//! - **Toggle**: voting the same value twice retracts the vote ([`VoteTransition`])
//! - **Projection**: an item's `votes` total is Σ value over its ledger entries ([`Tally`])
//!
//! ## Acceptance
//!
//! - At most one accepted answer per question ([`AcceptanceState`])
//! - Only the question's author may accept, and acceptance is only ever
//!   moved, never withdrawn ([`AcceptancePlan`])

pub mod acceptance;
pub mod config;
pub mod content;
pub mod core;
pub mod vote;

// Re-export commonly used types
pub use acceptance::{
    AcceptancePlan, AcceptanceState, AcceptanceViolation, QuestionPhase, verify_acceptance,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use content::{Answer, Question, VoteProjection};
pub use core::{
    error::DomainError,
    ids::{AnswerId, ItemId, QuestionId, UserId, VoteId},
};
pub use vote::{
    ItemKind, ItemRef, RecordVersion, Tally, VoteRecord, VoteTransition, VoteValue, most_recent,
    user_vote,
};
