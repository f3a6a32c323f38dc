//! Actions: the closed vocabulary of state transitions.
//!
//! An `Action` is the fully-disambiguated form of a player intent - what the
//! move resolver produces and what the router executes. Each variant has an
//! `ActionKind` discriminant used for handler registry lookup and error
//! context.
//!
//! `HandToTable` and `TableToTable` are dispatchers, not independent
//! mutations: their handlers inspect the target entity kind and delegate to
//! the staging/build logic.

pub mod build;
pub mod capture;
pub mod dispatch;
pub mod handler;
pub mod staging;
pub mod trail;

pub use handler::{ActionHandler, HandlerRegistry, Outcome};

use serde::{Deserialize, Serialize};

use crate::core::{Card, PlayerId};
use crate::state::{CardSource, EntityId};

/// A fully-disambiguated player action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Place a hand card face-up on the table without capturing.
    Trail { card: Card },

    /// Create a 2-card staging stack from a source card and a loose card.
    StartStaging {
        card: Card,
        source: CardSource,
        target: EntityId,
    },

    /// Add a card to the acting player's open staging stack.
    ExtendStaging {
        stack: EntityId,
        card: Card,
        source: CardSource,
    },

    /// Dissolve the acting player's staging stack back to loose cards.
    CancelStaging { stack: EntityId },

    /// Capture table entities with a matching card.
    Capture {
        card: Card,
        source: CardSource,
        targets: Vec<EntityId>,
    },

    /// Convert the acting player's staging stack into a permanent build.
    FinalizeBuild { stack: EntityId, value: u8 },

    /// Declare a build directly from a hand card and a loose card.
    CreateBuild {
        card: Card,
        target: EntityId,
        value: u8,
    },

    /// Append a card of the build's value to an extendable build.
    ExtendBuild {
        build: EntityId,
        card: Card,
        source: CardSource,
    },

    /// Dispatch: hand card dropped on a table entity.
    HandToTable { card: Card, target: EntityId },

    /// Dispatch: table entity dropped on another table entity.
    TableToTable { source: EntityId, target: EntityId },
}

impl Action {
    /// The discriminant for registry lookup and error context.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Trail { .. } => ActionKind::Trail,
            Action::StartStaging { .. } => ActionKind::StartStaging,
            Action::ExtendStaging { .. } => ActionKind::ExtendStaging,
            Action::CancelStaging { .. } => ActionKind::CancelStaging,
            Action::Capture { .. } => ActionKind::Capture,
            Action::FinalizeBuild { .. } => ActionKind::FinalizeBuild,
            Action::CreateBuild { .. } => ActionKind::CreateBuild,
            Action::ExtendBuild { .. } => ActionKind::ExtendBuild,
            Action::HandToTable { .. } => ActionKind::HandToTable,
            Action::TableToTable { .. } => ActionKind::TableToTable,
        }
    }
}

/// Action discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Trail,
    StartStaging,
    ExtendStaging,
    CancelStaging,
    Capture,
    FinalizeBuild,
    CreateBuild,
    ExtendBuild,
    HandToTable,
    TableToTable,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Trail => "trail",
            ActionKind::StartStaging => "start_staging",
            ActionKind::ExtendStaging => "extend_staging",
            ActionKind::CancelStaging => "cancel_staging",
            ActionKind::Capture => "capture",
            ActionKind::FinalizeBuild => "finalize_build",
            ActionKind::CreateBuild => "create_build",
            ActionKind::ExtendBuild => "extend_build",
            ActionKind::HandToTable => "hand_to_table",
            ActionKind::TableToTable => "table_to_table",
        };
        write!(f, "{name}")
    }
}

/// An action submitted on behalf of a player.
///
/// The actor is resolved server-side from the connection by the networking
/// collaborator - it is part of the payload, never inferred from the action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub actor: PlayerId,
    pub action: Action,
}

impl Submission {
    /// Convenience constructor.
    #[must_use]
    pub fn new(actor: PlayerId, action: Action) -> Self {
        Self { actor, action }
    }
}
