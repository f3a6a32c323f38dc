//! End-of-match scoring.
//!
//! Computed once at cleanup from both capture piles:
//!
//! - Ten of Diamonds: 2 points
//! - Two of Spades: 1 point
//! - each Ace: 1 point
//! - 6 or more spades: 2 points
//! - 21 or more cards: 2 points
//! - exactly 20 cards: 1 point (awarded to every pile holding exactly 20,
//!   so a 20/20 split cancels out)
//!
//! The strictly higher total wins; equal totals are a draw.

use im::Vector;

use crate::core::{Card, PlayerId, PlayerPair, Rank, Suit};
use crate::state::{MatchRecord, MatchResult};

const BIG_CASINO: Card = Card {
    rank: Rank::Ten,
    suit: Suit::Diamonds,
};
const LITTLE_CASINO: Card = Card {
    rank: Rank::Two,
    suit: Suit::Spades,
};

/// Score a single capture pile.
#[must_use]
pub fn score_pile(pile: &Vector<Card>) -> i32 {
    let mut points = 0;
    for card in pile {
        if *card == BIG_CASINO {
            points += 2;
        } else if *card == LITTLE_CASINO {
            points += 1;
        }
        if card.rank == Rank::Ace {
            points += 1;
        }
    }

    let spades = pile.iter().filter(|c| c.suit == Suit::Spades).count();
    if spades >= 6 {
        points += 2;
    }
    if pile.len() >= 21 {
        points += 2;
    } else if pile.len() == 20 {
        points += 1;
    }
    points
}

/// Score both piles of a record and decide the match.
#[must_use]
pub fn score_match(record: &MatchRecord) -> (PlayerPair<i32>, MatchResult) {
    let scores = PlayerPair::new(|p| score_pile(record.capture_pile(p)));
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let result = match scores[p0].cmp(&scores[p1]) {
        std::cmp::Ordering::Greater => MatchResult::Winner(p0),
        std::cmp::Ordering::Less => MatchResult::Winner(p1),
        std::cmp::Ordering::Equal => MatchResult::Draw,
    };
    (scores, result)
}
