//! Document store: the vote ledger and the question/answer collections.

mod document_store;
mod documents;

pub use document_store::DocumentStore;
pub use documents::{ImportSummary, SeedData};
