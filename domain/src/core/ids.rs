//! Identifier value objects.
//!
//! All identifiers are opaque strings issued by external collaborators
//! (the identity provider and the question/answer store), except
//! [`VoteId`], which the ledger generates itself.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Authenticated user, as supplied by the identity provider.
    UserId
);

string_id!(
    /// A question or an answer. Paired with an [`ItemKind`](crate::ItemKind)
    /// to form an [`ItemRef`](crate::ItemRef).
    ItemId
);

string_id!(
    /// Question identifier.
    QuestionId
);

string_id!(
    /// Answer identifier.
    AnswerId
);

string_id!(
    /// Identifier of a single ledger entry.
    VoteId
);

impl VoteId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl From<&QuestionId> for ItemId {
    fn from(id: &QuestionId) -> Self {
        Self::new(id.as_str())
    }
}

impl From<&AnswerId> for ItemId {
    fn from(id: &AnswerId) -> Self {
        Self::new(id.as_str())
    }
}
