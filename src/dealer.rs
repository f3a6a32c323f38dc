//! Dealing: deck shuffle and the initial match record.
//!
//! The dealer shuffles the 40-card deck once per match. Round 1 takes a hand
//! for each player plus the initial loose table cards; the remainder stays
//! with the record as the undealt deck for the round-2 re-deal.

use tracing::debug;

use crate::core::{full_deck, GameConfig, GameRng, PlayerPair};
use crate::state::MatchRecord;

/// Shuffles and produces initial match records.
#[derive(Clone, Debug)]
pub struct Dealer {
    rng: GameRng,
}

impl Dealer {
    /// Create a dealer with a deterministic seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    /// Shuffle a fresh deck and deal the initial record.
    #[must_use]
    pub fn deal(&mut self, config: &GameConfig) -> MatchRecord {
        let mut deck = full_deck();
        self.rng.shuffle(&mut deck);

        let mut next = deck.into_iter();
        let mut hands = PlayerPair::new(|_| Vec::with_capacity(config.hand_size));
        // Alternate cards between seats, as a dealer would.
        for _ in 0..config.hand_size {
            for player in crate::core::PlayerId::both() {
                if let Some(card) = next.next() {
                    hands[player].push(card);
                }
            }
        }

        let table_cards: Vec<_> = next.by_ref().take(config.initial_table_cards).collect();
        let rest: Vec<_> = next.collect();

        debug!(
            seed = self.rng.seed(),
            hand_size = config.hand_size,
            table = table_cards.len(),
            undealt = rest.len(),
            "dealt initial record"
        );

        MatchRecord::from_deal(hands, table_cards, rest)
    }
}
