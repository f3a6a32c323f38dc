//! Capturing table entities with a matching card.
//!
//! The capture action is fully disambiguated: the resolver has already
//! chosen which entities the card takes, so the handler only re-validates
//! the value arithmetic against the current record and moves the cards.

use crate::core::{Card, GameConfig, PlayerId};
use crate::error::{ActionError, ValidationError};
use crate::state::{CardSource, EntityId, MatchRecord, TableEntity};

use super::handler::{mismatch, ActionHandler, Outcome};
use super::{Action, ActionKind};

/// Capture `targets` with `card`. Captured cards enter the actor's pile in
/// target order, the capturing card last (on top).
pub fn capture(
    record: &mut MatchRecord,
    actor: PlayerId,
    card: Card,
    source: CardSource,
    targets: &[EntityId],
) -> Result<Outcome, ActionError> {
    if targets.is_empty() {
        return Err(ValidationError::EmptyCapture.into());
    }

    let value = card.value();
    let mut seen: Vec<EntityId> = Vec::with_capacity(targets.len());
    for &id in targets {
        if seen.contains(&id) {
            return Err(ValidationError::EntityNotFound(id).into());
        }
        seen.push(id);

        let entity = record
            .entity(id)
            .ok_or(ValidationError::EntityNotFound(id))?;
        let matches = match entity {
            TableEntity::Loose(lc) => lc.card.value() == value,
            TableEntity::Stack(st) => {
                if st.owner != actor {
                    return Err(ValidationError::NotStackOwner(id).into());
                }
                st.value() == value
                    || (st.uniform_rank() && st.cards[0].value() == value)
            }
            TableEntity::Build(b) => b.value == value,
        };
        if !matches {
            return Err(ValidationError::TargetMismatch(id, value).into());
        }
    }

    record.take_card(actor, card, source)?;
    for &id in targets {
        if let Some(entity) = record.remove_entity(id) {
            for c in entity.cards() {
                record.append_to_pile(actor, c);
            }
        }
    }
    record.append_to_pile(actor, card);
    record.last_capturer = Some(actor);
    Ok(Outcome::capture())
}

pub struct CaptureHandler;

impl ActionHandler for CaptureHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Capture
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        _config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::Capture { card, source, ref targets } = *action else {
            return Err(mismatch(self.kind()));
        };
        capture(record, actor, card, source, targets)
    }
}
