//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: opaque identifiers (users, items, questions, answers, votes)
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
