//! Use cases
//!
//! Application-level operations that orchestrate domain logic over the
//! store ports.

pub mod accept_answer;
pub mod project_total;
pub mod reconcile_totals;
pub mod service;
pub(crate) mod shared;
pub mod submit_vote;
pub mod vote_status;

#[cfg(test)]
pub(crate) mod test_support;

pub use shared::ErrorKind;
