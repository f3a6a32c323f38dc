//! Handler trait and registry.
//!
//! Each action kind has one handler: a pure state-transition function that
//! validates before mutating and reports how the turn should proceed. The
//! registry is built explicitly at startup and injected into the router -
//! there is no process-wide mutable handler table.
//!
//! Handlers always receive a draft record: the router clones the canonical
//! record first and commits only on success, so a failing handler can never
//! leave a half-mutated match behind.

use rustc_hash::FxHashMap;

use crate::core::{GameConfig, PlayerId};
use crate::error::ActionError;
use crate::state::MatchRecord;

use super::{Action, ActionKind};

/// How a successful action affects turn flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// The action kind always ends the acting player's turn.
    pub force_switch: bool,
    /// Cards were captured (updates the last-capturer bookkeeping).
    pub captured: bool,
}

impl Outcome {
    /// Turn continues unless the player has no further legal move.
    #[must_use]
    pub const fn stay() -> Self {
        Self {
            force_switch: false,
            captured: false,
        }
    }

    /// Turn ends unconditionally.
    #[must_use]
    pub const fn switch() -> Self {
        Self {
            force_switch: true,
            captured: false,
        }
    }

    /// A capture: turn ends and the capture bookkeeping updates.
    #[must_use]
    pub const fn capture() -> Self {
        Self {
            force_switch: true,
            captured: true,
        }
    }
}

/// A state-transition function for one action kind.
///
/// `Send + Sync` so a registry can be shared by a multithreaded server.
pub trait ActionHandler: Send + Sync {
    /// The action kind this handler serves.
    fn kind(&self) -> ActionKind;

    /// Validate and apply `action` to the draft on behalf of `actor`.
    ///
    /// Turn order and game-over checks have already happened in the router.
    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        config: &GameConfig,
    ) -> Result<Outcome, ActionError>;
}

/// Returned by handlers when the router routes a mismatched variant to
/// them; indicates a wiring bug, not a player error.
pub(crate) fn mismatch(kind: ActionKind) -> ActionError {
    ActionError::Internal(format!("handler for {kind} received a different action variant"))
}

/// Explicit handler lookup table, constructed once and injected into the
/// router.
pub struct HandlerRegistry {
    handlers: FxHashMap<ActionKind, Box<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// An empty registry (tests compose their own).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// The full standard rule set.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(super::trail::TrailHandler));
        registry.register(Box::new(super::staging::StartStagingHandler));
        registry.register(Box::new(super::staging::ExtendStagingHandler));
        registry.register(Box::new(super::staging::CancelStagingHandler));
        registry.register(Box::new(super::capture::CaptureHandler));
        registry.register(Box::new(super::build::FinalizeBuildHandler));
        registry.register(Box::new(super::build::CreateBuildHandler));
        registry.register(Box::new(super::build::ExtendBuildHandler));
        registry.register(Box::new(super::dispatch::HandToTableHandler));
        registry.register(Box::new(super::dispatch::TableToTableHandler));
        registry
    }

    /// Register a handler under its own kind, replacing any previous one.
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    /// Look up the handler for an action kind.
    #[must_use]
    pub fn get(&self, kind: ActionKind) -> Option<&dyn ActionHandler> {
        self.handlers.get(&kind).map(Box::as_ref)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
