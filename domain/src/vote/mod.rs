//! Vote ledger domain
//!
//! A vote is a per-user, per-item singleton: the ledger holds at most one
//! [`VoteRecord`] for each `(user, item)` pair, and an item's denormalized
//! total is always derived from the ledger by summation ([`Tally`]).
//!
//! ```text
//!   incoming vote ──► VoteTransition::decide(existing, incoming)
//!                          │
//!        ┌─────────────────┼──────────────────┐
//!        ▼                 ▼                  ▼
//!     Insert(v)         Retract            Flip(v)
//!   (new record)    (delete record)   (update in place)
//! ```

pub mod record;
pub mod tally;
pub mod transition;
pub mod value;

pub use record::{RecordVersion, VoteRecord, most_recent, user_vote};
pub use tally::Tally;
pub use transition::VoteTransition;
pub use value::{ItemKind, ItemRef, VoteValue};
