//! Builds: finalizing a staging stack, declaring one directly, extending.
//!
//! A build's value is fixed at creation. Extendability is structural: the
//! build must sit below the card ceiling, read as a single group at its
//! value, and admit exactly one interpretation. The declared value must be
//! backed by a capturing card in the owner's hand at creation time.

use crate::core::{Card, GameConfig, PlayerId};
use crate::error::{ActionError, ValidationError};
use crate::resolver::grouping::{interpretation_count, partition_for_value};
use crate::state::{Build, CardSource, EntityId, MatchRecord, TableEntity};

use super::handler::{mismatch, ActionHandler, Outcome};
use super::{Action, ActionKind};

fn compute_extendable(cards: &[Card], value: u8, config: &GameConfig) -> bool {
    cards.len() < config.max_build_cards
        && partition_for_value(cards, value).is_some_and(|groups| groups.len() == 1)
        && interpretation_count(cards, value) == 1
}

fn hand_has_value_besides(record: &MatchRecord, actor: PlayerId, value: u8, used: Card) -> bool {
    record
        .hand(actor)
        .iter()
        .any(|&c| c != used && c.value() == value)
}

/// Convert the actor's staging stack into a permanent build of `value`.
pub fn finalize(
    record: &mut MatchRecord,
    actor: PlayerId,
    stack_id: EntityId,
    value: u8,
    config: &GameConfig,
) -> Result<Outcome, ActionError> {
    let stack = match record.entity(stack_id) {
        Some(TableEntity::Stack(st)) => st,
        Some(_) => return Err(ValidationError::WrongEntityKind(stack_id, "staging stack").into()),
        None => return Err(ValidationError::EntityNotFound(stack_id).into()),
    };
    if stack.owner != actor {
        return Err(ValidationError::NotStackOwner(stack_id).into());
    }
    if partition_for_value(&stack.cards, value).is_none() {
        return Err(ValidationError::ValueMismatch(value).into());
    }
    // The declared value must be backed by a card still in hand.
    if !record.hand_has_value(actor, value) {
        return Err(ValidationError::NoCapturingCard(value).into());
    }

    let cards = stack.cards.clone();
    let extendable = compute_extendable(&cards, value, config);
    record.replace_entity(
        stack_id,
        TableEntity::Build(Build {
            id: stack_id,
            owner: actor,
            value,
            cards,
            extendable,
        }),
    );
    Ok(Outcome::switch())
}

/// Declare a build directly from a hand card dropped on a loose card.
///
/// Legal values are the pair sum (when it stays within card range) and,
/// for equal ranks, the shared card value.
pub fn create(
    record: &mut MatchRecord,
    actor: PlayerId,
    card: Card,
    target: EntityId,
    value: u8,
    config: &GameConfig,
) -> Result<Outcome, ActionError> {
    let base = match record.entity(target) {
        Some(TableEntity::Loose(lc)) => lc.card,
        Some(_) => return Err(ValidationError::WrongEntityKind(target, "loose card").into()),
        None => return Err(ValidationError::EntityNotFound(target).into()),
    };
    if !record.hand_contains(actor, card) {
        return Err(ValidationError::CardNotInHand(card).into());
    }

    let sum = card.value() + base.value();
    let sum_build = value == sum && sum <= 10;
    let same_value_build = card.rank == base.rank && value == card.value();
    if !sum_build && !same_value_build {
        return Err(ValidationError::ValueMismatch(value).into());
    }
    if !hand_has_value_besides(record, actor, value, card) {
        return Err(ValidationError::NoCapturingCard(value).into());
    }

    record.remove_from_hand(actor, card);
    let cards = vec![base, card];
    let extendable = compute_extendable(&cards, value, config);
    record.replace_entity(
        target,
        TableEntity::Build(Build {
            id: target,
            owner: actor,
            value,
            cards,
            extendable,
        }),
    );
    Ok(Outcome::switch())
}

/// Append a card of the build's value to an extendable build.
pub fn extend(
    record: &mut MatchRecord,
    actor: PlayerId,
    build_id: EntityId,
    card: Card,
    source: CardSource,
    config: &GameConfig,
) -> Result<Outcome, ActionError> {
    let build = match record.entity(build_id) {
        Some(TableEntity::Build(b)) => b,
        Some(_) => return Err(ValidationError::WrongEntityKind(build_id, "build").into()),
        None => return Err(ValidationError::EntityNotFound(build_id).into()),
    };
    if build.owner != actor {
        return Err(ValidationError::NotBuildOwner(build_id).into());
    }
    if !build.extendable {
        return Err(ValidationError::BuildNotExtendable(build_id).into());
    }
    if card.value() != build.value {
        return Err(ValidationError::ValueMismatch(card.value()).into());
    }
    let value = build.value;
    let mut cards = build.cards.clone();

    record.take_card(actor, card, source)?;
    cards.push(card);
    let at_ceiling = cards.len() >= config.max_build_cards;
    let extendable = compute_extendable(&cards, value, config);
    record.replace_entity(
        build_id,
        TableEntity::Build(Build {
            id: build_id,
            owner: actor,
            value,
            cards,
            extendable,
        }),
    );
    // The turn only ends when the extension completes the build.
    if at_ceiling {
        Ok(Outcome::switch())
    } else {
        Ok(Outcome::stay())
    }
}

pub struct FinalizeBuildHandler;

impl ActionHandler for FinalizeBuildHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::FinalizeBuild
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::FinalizeBuild { stack, value } = *action else {
            return Err(mismatch(self.kind()));
        };
        finalize(record, actor, stack, value, config)
    }
}

pub struct CreateBuildHandler;

impl ActionHandler for CreateBuildHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CreateBuild
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::CreateBuild { card, target, value } = *action else {
            return Err(mismatch(self.kind()));
        };
        create(record, actor, card, target, value, config)
    }
}

pub struct ExtendBuildHandler;

impl ActionHandler for ExtendBuildHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::ExtendBuild
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::ExtendBuild { build, card, source } = *action else {
            return Err(mismatch(self.kind()));
        };
        extend(record, actor, build, card, source, config)
    }
}
