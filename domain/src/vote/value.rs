//! Vote value objects: the vote direction, the kind of item voted on,
//! and the reference that ties them together.

use crate::core::error::DomainError;
use crate::core::ids::ItemId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a single vote.
///
/// Serialized as the integer `1` or `-1`.
///
/// # Example
///
/// ```
/// use ledger_domain::VoteValue;
///
/// let up = VoteValue::try_from(1).unwrap();
/// assert_eq!(up, VoteValue::Up);
/// assert_eq!(up.opposite(), VoteValue::Down);
/// assert!(VoteValue::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Signed contribution of this vote to an item's total.
    pub fn as_i64(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VoteValue::Up => VoteValue::Down,
            VoteValue::Down => VoteValue::Up,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(DomainError::InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        value.as_i64()
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.as_i64())
    }
}

/// Kind of votable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Question,
    Answer,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Question => "question",
            ItemKind::Answer => "answer",
        }
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" => Ok(ItemKind::Question),
            "answer" => Ok(ItemKind::Answer),
            _ => Err(DomainError::UnknownItemKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully qualified reference to a votable item.
///
/// Question and answer ids live in separate namespaces, so the kind is part
/// of the identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(rename = "item_id")]
    pub id: ItemId,
    #[serde(rename = "item_kind")]
    pub kind: ItemKind,
}

impl ItemRef {
    pub fn new(id: impl Into<ItemId>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn question(id: impl Into<ItemId>) -> Self {
        Self::new(id, ItemKind::Question)
    }

    pub fn answer(id: impl Into<ItemId>) -> Self {
        Self::new(id, ItemKind::Answer)
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_value_rejects_out_of_range() {
        assert_eq!(VoteValue::try_from(1), Ok(VoteValue::Up));
        assert_eq!(VoteValue::try_from(-1), Ok(VoteValue::Down));
        assert_eq!(
            VoteValue::try_from(0),
            Err(DomainError::InvalidVoteValue(0))
        );
        assert_eq!(
            VoteValue::try_from(5),
            Err(DomainError::InvalidVoteValue(5))
        );
    }

    #[test]
    fn test_vote_value_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&VoteValue::Down).unwrap(), "-1");
        let up: VoteValue = serde_json::from_str("1").unwrap();
        assert_eq!(up, VoteValue::Up);
        assert!(serde_json::from_str::<VoteValue>("2").is_err());
    }

    #[test]
    fn test_vote_value_display_is_signed() {
        assert_eq!(VoteValue::Up.to_string(), "+1");
        assert_eq!(VoteValue::Down.to_string(), "-1");
    }

    #[test]
    fn test_item_kind_parse() {
        assert_eq!("question".parse::<ItemKind>(), Ok(ItemKind::Question));
        assert_eq!("Answer".parse::<ItemKind>(), Ok(ItemKind::Answer));
        assert_eq!(
            "comment".parse::<ItemKind>(),
            Err(DomainError::UnknownItemKind("comment".to_string()))
        );
    }

    #[test]
    fn test_item_ref_display() {
        assert_eq!(ItemRef::answer("a-7").to_string(), "answer:a-7");
    }

    #[test]
    fn test_same_id_different_kind_are_distinct() {
        assert_ne!(ItemRef::question("1"), ItemRef::answer("1"));
    }
}
