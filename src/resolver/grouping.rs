//! Sequential grouping: partitioning a staging stack against a target value.
//!
//! Given a stack's cards in stacking order and a candidate value, the stack
//! is split left-to-right into contiguous groups. At each position a 3-card
//! group is tried first, then 2-card, then 1-card; the first group summing
//! exactly to the target is accepted and the scan continues after it. If no
//! group size matches at some position the whole candidate value fails -
//! there is deliberately no backtracking to alternate partitions, for
//! fidelity with the established game behavior.
//!
//! `interpretation_count` is the exhaustive counterpart used only for build
//! extendability analysis: a build with more than one way to read its cards
//! is ambiguous and locked.

use smallvec::SmallVec;

use crate::core::Card;

/// One contiguous group of stack cards summing to the target value.
pub type CardGroup = SmallVec<[Card; 3]>;

/// A successful grouping: the chosen value and the partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping {
    pub value: u8,
    pub groups: Vec<CardGroup>,
}

/// Largest group size tried at each position.
const MAX_GROUP: usize = 3;

/// Partition `cards` left-to-right into contiguous groups summing to
/// `target`, greedy largest-group-first, no backtracking.
#[must_use]
pub fn partition_for_value(cards: &[Card], target: u8) -> Option<Vec<CardGroup>> {
    if cards.is_empty() {
        return None;
    }

    let mut groups = Vec::new();
    let mut at = 0;
    while at < cards.len() {
        let mut taken = None;
        for size in (1..=MAX_GROUP).rev() {
            if at + size > cards.len() {
                continue;
            }
            let sum: u8 = cards[at..at + size].iter().map(|c| c.value()).sum();
            if sum == target {
                taken = Some(size);
                break;
            }
        }
        let size = taken?;
        groups.push(SmallVec::from_slice(&cards[at..at + size]));
        at += size;
    }
    Some(groups)
}

/// Try candidate values in the order given, returning the first that
/// fully partitions the stack. Ties are not re-evaluated: callers pass
/// hand values ascending, so the lowest workable value wins.
#[must_use]
pub fn first_grouping(cards: &[Card], candidates: &[u8]) -> Option<Grouping> {
    candidates.iter().find_map(|&value| {
        partition_for_value(cards, value).map(|groups| Grouping { value, groups })
    })
}

/// Count every contiguous partition of `cards` into groups of 1-3 cards
/// each summing to `target` (full backtracking, unlike the greedy scan).
///
/// Used for extendability: a build is locked once its cards admit more
/// than one reading.
#[must_use]
pub fn interpretation_count(cards: &[Card], target: u8) -> usize {
    fn count_from(cards: &[Card], target: u8, at: usize) -> usize {
        if at == cards.len() {
            return 1;
        }
        let mut total = 0;
        for size in 1..=MAX_GROUP {
            if at + size > cards.len() {
                break;
            }
            let sum: u8 = cards[at..at + size].iter().map(|c| c.value()).sum();
            if sum == target {
                total += count_from(cards, target, at + size);
            }
        }
        total
    }

    if cards.is_empty() {
        0
    } else {
        count_from(cards, target, 0)
    }
}
