//! Single-accepted-answer domain.

pub mod state;

pub use state::{
    AcceptancePlan, AcceptanceState, AcceptanceViolation, QuestionPhase, verify_acceptance,
};
