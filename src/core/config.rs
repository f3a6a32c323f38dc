//! Game configuration.
//!
//! `GameConfig` fixes the dealt sizes and structural limits for a match.
//! Defaults describe the standard game: 9-card hands, 4 initial loose table
//! cards, which exactly consumes the 40-card deck over the two rounds.

use serde::{Deserialize, Serialize};

use super::card::DECK_SIZE;
use super::player::PLAYERS;

/// Structural configuration for a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cards dealt to each hand at the start of each round.
    pub hand_size: usize,

    /// Loose cards dealt to the table at the start of round 1.
    pub initial_table_cards: usize,

    /// Card-count ceiling above which a build can no longer be extended.
    pub max_build_cards: usize,

    /// Cap on the turn-completion diagnostic log.
    pub max_turn_flags: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: 9,
            initial_table_cards: 4,
            max_build_cards: 4,
            max_turn_flags: 128,
        }
    }
}

impl GameConfig {
    /// Standard configuration.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Set the per-round hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the number of initial loose table cards.
    #[must_use]
    pub fn with_initial_table_cards(mut self, count: usize) -> Self {
        self.initial_table_cards = count;
        self
    }

    /// Set the build card ceiling.
    #[must_use]
    pub fn with_max_build_cards(mut self, count: usize) -> Self {
        self.max_build_cards = count;
        self
    }

    /// Check that two rounds of hands plus the initial table exactly
    /// consume the deck.
    #[must_use]
    pub fn consumes_deck(&self) -> bool {
        2 * PLAYERS * self.hand_size + self.initial_table_cards == DECK_SIZE
    }
}
