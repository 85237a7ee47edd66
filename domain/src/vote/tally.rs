//! Sum-by-item over the ledger.

use crate::vote::value::VoteValue;
use serde::{Deserialize, Serialize};

/// Aggregate of every ledger entry referencing one item.
///
/// `watermark` is the item's ledger sequence at the time the tally was
/// read. Projections carry it so a slower, older recomputation can never
/// overwrite a newer one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: i64,
    pub upvotes: u64,
    pub downvotes: u64,
    pub watermark: u64,
}

impl Tally {
    pub fn from_values(values: impl IntoIterator<Item = VoteValue>, watermark: u64) -> Self {
        let mut tally = Tally {
            watermark,
            ..Default::default()
        };
        for value in values {
            match value {
                VoteValue::Up => tally.upvotes += 1,
                VoteValue::Down => tally.downvotes += 1,
            }
            tally.total += value.as_i64();
        }
        tally
    }

    pub fn voter_count(&self) -> u64 {
        self.upvotes + self.downvotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_sums_signed() {
        let tally = Tally::from_values(
            [VoteValue::Up, VoteValue::Up, VoteValue::Down, VoteValue::Up],
            7,
        );
        assert_eq!(tally.total, 2);
        assert_eq!(tally.upvotes, 3);
        assert_eq!(tally.downvotes, 1);
        assert_eq!(tally.voter_count(), 4);
        assert_eq!(tally.watermark, 7);
    }

    #[test]
    fn test_empty_tally_is_zero() {
        let tally = Tally::from_values([], 0);
        assert_eq!(tally, Tally::default());
    }
}
