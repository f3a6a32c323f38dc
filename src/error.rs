//! Error taxonomy.
//!
//! Three layers, mirroring how far a submission got:
//!
//! - `ValidationError`: a precondition failed before any mutation. The
//!   record is unchanged and the client may retry after resyncing.
//! - `ActionError`: what a handler returns - either a validation failure or
//!   an internal inconsistency discovered mid-flight (the draft is discarded
//!   either way).
//! - `GameError`: the router/engine boundary error, with the offending
//!   action kind attached for client context.
//!
//! None of these are process-fatal; retry and reset decisions belong to the
//! caller.

use thiserror::Error;

use crate::actions::ActionKind;
use crate::core::{Card, PlayerId, Rank};
use crate::state::EntityId;

/// A precondition failure. Rejected before any mutation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("it is not {0}'s turn")]
    OutOfTurn(PlayerId),

    #[error("the match is already over")]
    MatchOver,

    #[error("card {0} is not in the acting player's hand")]
    CardNotInHand(Card),

    #[error("card {0} is not available at the declared source")]
    CardNotAtSource(Card),

    #[error("a loose {0} is already on the table; capture it instead of trailing")]
    DuplicateTrailRank(Rank),

    #[error("cannot trail in round 1 while owning an unresolved build")]
    BuildOwnerCannotTrail,

    #[error("{0} already has an open staging stack")]
    StagingStackLimit(PlayerId),

    #[error("only one hand card may be staged per turn")]
    HandCardAlreadyStaged,

    #[error("{0} not found on the table")]
    EntityNotFound(EntityId),

    #[error("{0} is not a {1}")]
    WrongEntityKind(EntityId, &'static str),

    #[error("staging stack {0} is not owned by the acting player")]
    NotStackOwner(EntityId),

    #[error("build {0} is not owned by the acting player")]
    NotBuildOwner(EntityId),

    #[error("declared value {0} does not match any legal resolution")]
    ValueMismatch(u8),

    #[error("no hand card of value {0} to capture the build with")]
    NoCapturingCard(u8),

    #[error("build {0} can no longer be extended")]
    BuildNotExtendable(EntityId),

    #[error("capture target {0} does not match value {1}")]
    TargetMismatch(EntityId, u8),

    #[error("capture requires at least one target")]
    EmptyCapture,
}

/// What a handler returns: validation failures plus internal faults.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The draft record contradicted an invariant the handler relies on.
    #[error("internal handler fault: {0}")]
    Internal(String),
}

/// The router/engine boundary error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{action} rejected: {source}")]
    Validation {
        action: ActionKind,
        #[source]
        source: ValidationError,
    },

    #[error("unknown action type {0}")]
    UnknownAction(ActionKind),

    #[error("{action} handler failed: {message}")]
    Handler { action: ActionKind, message: String },

    #[error("match {0} not found")]
    MatchNotFound(u64),
}

impl GameError {
    /// Wrap a handler error with the action kind it came from.
    #[must_use]
    pub fn from_action(action: ActionKind, err: ActionError) -> Self {
        match err {
            ActionError::Validation(source) => GameError::Validation { action, source },
            ActionError::Internal(message) => GameError::Handler { action, message },
        }
    }

    /// True for rejections that left the record untouched by design.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, GameError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_wrapping() {
        let err = GameError::from_action(
            ActionKind::Trail,
            ActionError::Validation(ValidationError::MatchOver),
        );
        assert!(err.is_validation());
        assert_eq!(format!("{err}"), "trail rejected: the match is already over");
    }

    #[test]
    fn test_internal_wrapping() {
        let err = GameError::from_action(
            ActionKind::Capture,
            ActionError::Internal("entity index out of sync".into()),
        );
        assert!(!err.is_validation());
    }
}
