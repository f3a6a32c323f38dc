//! # casino-engine
//!
//! A server-authoritative engine for a two-player build-and-capture card
//! game played with a 40-card deck over two rounds.
//!
//! ## Design Principles
//!
//! 1. **Server-Authoritative**: clients submit intents and actions; every
//!    rule is validated here against the canonical record.
//!
//! 2. **Atomic Actions**: handlers run against a cloned draft and commit
//!    only on success. Persistent collections make the clone O(1).
//!
//! 3. **Explicit Vocabulary**: the resolver turns raw drop intents into a
//!    closed set of fully-disambiguated actions; the router executes them
//!    through an injected handler registry.
//!
//! ## Modules
//!
//! - `core`: cards, players, RNG, configuration
//! - `state`: table entities and the canonical match record
//! - `dealer`: deck shuffle and the initial deal
//! - `resolver`: drop-intent resolution and sequential grouping
//! - `actions`: the action vocabulary and its handlers
//! - `router`: turn order, atomic commits, turn and round policy
//! - `scoring`: end-of-match point and bonus scoring
//! - `engine`: match lifecycle management
//! - `error`: the validation/handler/router error taxonomy

pub mod actions;
pub mod core;
pub mod dealer;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod router;
pub mod scoring;
pub mod state;

// Re-export commonly used types
pub use crate::core::{full_deck, Card, GameConfig, GameRng, PlayerId, PlayerPair, Rank, Suit, DECK_SIZE, PLAYERS};

pub use crate::state::{
    Build, CardSource, EntityId, LooseCard, MatchRecord, MatchResult, StagingStack, TableEntity,
};

pub use crate::actions::{
    Action, ActionHandler, ActionKind, HandlerRegistry, Outcome, Submission,
};

pub use crate::dealer::Dealer;

pub use crate::resolver::{
    DragItem, DragSource, DropTarget, Grouping, MoveOption, MoveResolver, Resolution,
};

pub use crate::router::ActionRouter;

pub use crate::scoring::{score_match, score_pile};

pub use crate::engine::{MatchId, MatchManager};

pub use crate::error::{ActionError, GameError, ValidationError};
