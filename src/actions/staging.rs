//! Staging stacks: start, extend, cancel.
//!
//! A staging stack is the provisional workspace a player assembles before
//! committing to a capture or a build. The logic lives in free functions so
//! the dispatch handlers (`HandToTable`, `TableToTable`) can reuse it
//! without going back through the registry.
//!
//! Extending with a card equal to the stack's running value is a capture
//! shortcut: the stack and the card go straight to the actor's pile.

use crate::core::{Card, GameConfig, PlayerId};
use crate::error::{ActionError, ValidationError};
use crate::state::{CardSource, EntityId, MatchRecord, StagingStack, TableEntity};

use super::handler::{mismatch, ActionHandler, Outcome};
use super::{Action, ActionKind};

/// Create a 2-card staging stack from `card` dropped on the loose card
/// `target`. The stack takes over the target's entity ID and position.
pub fn start(
    record: &mut MatchRecord,
    actor: PlayerId,
    card: Card,
    source: CardSource,
    target: EntityId,
) -> Result<Outcome, ActionError> {
    if record.stack_of(actor).is_some() {
        return Err(ValidationError::StagingStackLimit(actor).into());
    }
    let base = match record.entity(target) {
        Some(TableEntity::Loose(lc)) => lc.card,
        Some(_) => return Err(ValidationError::WrongEntityKind(target, "loose card").into()),
        None => return Err(ValidationError::EntityNotFound(target).into()),
    };
    // A card cannot be dragged onto itself.
    if source == (CardSource::TableLoose { entity: target }) {
        return Err(ValidationError::CardNotAtSource(card).into());
    }

    record.take_card(actor, card, source)?;
    let replaced = record.replace_entity(
        target,
        TableEntity::Stack(StagingStack {
            id: target,
            owner: actor,
            cards: vec![base, card],
        }),
    );
    debug_assert!(replaced);
    Ok(Outcome::stay())
}

/// Add `card` to the actor's staging stack.
///
/// If the card's value equals the stack's running value the addition is a
/// capture shortcut instead: stack and card move to the actor's pile.
pub fn extend(
    record: &mut MatchRecord,
    actor: PlayerId,
    stack_id: EntityId,
    card: Card,
    source: CardSource,
) -> Result<Outcome, ActionError> {
    let stack = match record.entity(stack_id) {
        Some(TableEntity::Stack(st)) => st,
        Some(_) => return Err(ValidationError::WrongEntityKind(stack_id, "staging stack").into()),
        None => return Err(ValidationError::EntityNotFound(stack_id).into()),
    };
    if stack.owner != actor {
        return Err(ValidationError::NotStackOwner(stack_id).into());
    }
    if source == CardSource::Hand && record.hand_card_staged(actor) {
        return Err(ValidationError::HandCardAlreadyStaged.into());
    }
    let stack_value = stack.value();
    let mut cards = stack.cards.clone();

    record.take_card(actor, card, source)?;

    if card.value() == stack_value {
        // Capture shortcut: the whole stack plus the matching card.
        record.remove_entity(stack_id);
        for c in cards {
            record.append_to_pile(actor, c);
        }
        record.append_to_pile(actor, card);
        record.last_capturer = Some(actor);
        return Ok(Outcome::capture());
    }

    cards.push(card);
    record.replace_entity(
        stack_id,
        TableEntity::Stack(StagingStack {
            id: stack_id,
            owner: actor,
            cards,
        }),
    );
    if source == CardSource::Hand {
        record.mark_hand_card_staged(actor);
    }
    Ok(Outcome::stay())
}

/// Dissolve the actor's staging stack back into loose cards, returned to
/// the table in reverse of their stacking order (last added first).
pub fn cancel(
    record: &mut MatchRecord,
    actor: PlayerId,
    stack_id: EntityId,
) -> Result<Outcome, ActionError> {
    let stack = match record.entity(stack_id) {
        Some(TableEntity::Stack(st)) => st,
        Some(_) => return Err(ValidationError::WrongEntityKind(stack_id, "staging stack").into()),
        None => return Err(ValidationError::EntityNotFound(stack_id).into()),
    };
    if stack.owner != actor {
        return Err(ValidationError::NotStackOwner(stack_id).into());
    }
    let cards = stack.cards.clone();

    record.remove_entity(stack_id);
    for card in cards.into_iter().rev() {
        record.push_loose(card);
    }
    Ok(Outcome::stay())
}

pub struct StartStagingHandler;

impl ActionHandler for StartStagingHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::StartStaging
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        _config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::StartStaging { card, source, target } = *action else {
            return Err(mismatch(self.kind()));
        };
        start(record, actor, card, source, target)
    }
}

pub struct ExtendStagingHandler;

impl ActionHandler for ExtendStagingHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::ExtendStaging
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        _config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::ExtendStaging { stack, card, source } = *action else {
            return Err(mismatch(self.kind()));
        };
        extend(record, actor, stack, card, source)
    }
}

pub struct CancelStagingHandler;

impl ActionHandler for CancelStagingHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CancelStaging
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        _config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::CancelStaging { stack } = *action else {
            return Err(mismatch(self.kind()));
        };
        cancel(record, actor, stack)
    }
}
