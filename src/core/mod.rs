//! Core types: cards, players, configuration, RNG.

pub mod card;
pub mod config;
pub mod player;
pub mod rng;

pub use card::{full_deck, Card, Rank, Suit, DECK_SIZE};
pub use config::GameConfig;
pub use player::{PlayerId, PlayerPair, PLAYERS};
pub use rng::GameRng;
