//! Table entities: the closed set of things that can sit on the table.
//!
//! The table mixes three entity kinds, modelled as a tagged union so every
//! consumer dispatches with an exhaustive `match`:
//!
//! - `Loose`: a single unattached card.
//! - `Stack`: a provisional, single-owner staging stack awaiting resolution
//!   (capture, conversion to a build, or cancel).
//! - `Build`: a permanent object with a fixed value, capturable only by a
//!   card of exactly that value.
//!
//! Every entity carries a stable `EntityId` so clients can reference table
//! objects across snapshots without relying on positional indices.

use serde::{Deserialize, Serialize};

use crate::core::{Card, PlayerId};

/// Stable identifier for a table entity within one match.
///
/// IDs are allocated by the match record and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity {}", self.0)
    }
}

/// Where a card is taken from when an action consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum CardSource {
    /// The acting player's hand.
    Hand,
    /// A loose card on the table.
    TableLoose { entity: EntityId },
    /// The top card of the acting player's own capture pile.
    OwnPile,
    /// The top card of the opponent's capture pile.
    OpponentPile,
}

/// A card sitting unattached on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LooseCard {
    pub id: EntityId,
    pub card: Card,
}

/// A provisional, single-owner grouping of cards awaiting resolution.
///
/// The owner never changes after creation. Cards are kept in stacking
/// order; the derived value is the running sum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingStack {
    pub id: EntityId,
    pub owner: PlayerId,
    pub cards: Vec<Card>,
}

impl StagingStack {
    /// Running value: the sum of all staged card values.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.cards.iter().map(|c| c.value()).sum()
    }

    /// Whether every staged card shares one rank.
    #[must_use]
    pub fn uniform_rank(&self) -> bool {
        self.cards
            .first()
            .is_some_and(|head| self.cards.iter().all(|c| c.rank == head.rank))
    }
}

/// A permanent table object with a fixed value.
///
/// The value never changes after creation; extension appends cards of
/// exactly that value while the build remains extendable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: EntityId,
    pub owner: PlayerId,
    pub value: u8,
    pub cards: Vec<Card>,
    pub extendable: bool,
}

/// One entry in the table collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableEntity {
    Loose(LooseCard),
    Stack(StagingStack),
    Build(Build),
}

impl TableEntity {
    /// The entity's stable identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        match self {
            TableEntity::Loose(lc) => lc.id,
            TableEntity::Stack(st) => st.id,
            TableEntity::Build(b) => b.id,
        }
    }

    /// All cards contained in this entity, in internal order.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        match self {
            TableEntity::Loose(lc) => vec![lc.card],
            TableEntity::Stack(st) => st.cards.clone(),
            TableEntity::Build(b) => b.cards.clone(),
        }
    }

    /// The value a capturing card must match for this entity.
    #[must_use]
    pub fn capture_value(&self) -> u8 {
        match self {
            TableEntity::Loose(lc) => lc.card.value(),
            TableEntity::Stack(st) => st.value(),
            TableEntity::Build(b) => b.value,
        }
    }
}
