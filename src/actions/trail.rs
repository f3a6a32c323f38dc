//! Trailing: laying a hand card on the table without capturing.

use crate::core::{GameConfig, PlayerId};
use crate::error::{ActionError, ValidationError};
use crate::state::MatchRecord;

use super::handler::{mismatch, ActionHandler, Outcome};
use super::{Action, ActionKind};

pub struct TrailHandler;

impl ActionHandler for TrailHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Trail
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        _config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::Trail { card } = *action else {
            return Err(mismatch(self.kind()));
        };

        if !record.hand_contains(actor, card) {
            return Err(ValidationError::CardNotInHand(card).into());
        }
        if record.loose_rank_on_table(card.rank) {
            return Err(ValidationError::DuplicateTrailRank(card.rank).into());
        }
        // Build owners must work their build in round 1, not stall.
        if record.round == 1 && record.owns_build(actor) {
            return Err(ValidationError::BuildOwnerCannotTrail.into());
        }

        record.remove_from_hand(actor, card);
        record.push_loose(card);
        Ok(Outcome::switch())
    }
}
