//! Application layer for vote-ledger
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{LedgerParams, RetryPolicy};
pub use ports::{
    content_store::{AcceptanceCommit, ContentStore, ProjectionWrite},
    store_error::StoreError,
    vote_ledger::{CommitOutcome, VoteLedger},
};
pub use use_cases::ErrorKind;
pub use use_cases::accept_answer::{
    AcceptAnswerError, AcceptAnswerInput, AcceptAnswerUseCase, AcceptOutcome,
};
pub use use_cases::project_total::{ItemTally, Projection, ProjectTotalUseCase};
pub use use_cases::reconcile_totals::{ReconcileError, ReconcileReport, ReconcileTotalsUseCase};
pub use use_cases::service::{DynLedgerService, LedgerService};
pub use use_cases::submit_vote::{SubmitVoteInput, SubmitVoteUseCase, VoteError, VoteOutcome};
pub use use_cases::vote_status::{VoteStatus, VoteStatusInput, VoteStatusUseCase};
