//! Questions and answers: the votable items owned by the external
//! question/answer store.

pub mod entities;

pub use entities::{Answer, Question, VoteProjection};
