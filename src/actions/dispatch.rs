//! Drop dispatchers: route a raw drop to the staging or build logic.
//!
//! `HandToTable` and `TableToTable` cover the unambiguous drops a client
//! may submit without going through intent resolution. The handler inspects
//! the target entity kind and delegates; all validation happens in the
//! delegated function.

use crate::core::{GameConfig, PlayerId};
use crate::error::{ActionError, ValidationError};
use crate::state::{CardSource, MatchRecord, TableEntity};

use super::handler::{mismatch, ActionHandler, Outcome};
use super::{build, staging, Action, ActionKind};

pub struct HandToTableHandler;

impl ActionHandler for HandToTableHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::HandToTable
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::HandToTable { card, target } = *action else {
            return Err(mismatch(self.kind()));
        };

        match record.entity(target) {
            Some(TableEntity::Loose(_)) => {
                staging::start(record, actor, card, CardSource::Hand, target)
            }
            Some(TableEntity::Stack(_)) => {
                staging::extend(record, actor, target, card, CardSource::Hand)
            }
            Some(TableEntity::Build(_)) => {
                build::extend(record, actor, target, card, CardSource::Hand, config)
            }
            None => Err(ValidationError::EntityNotFound(target).into()),
        }
    }
}

pub struct TableToTableHandler;

impl ActionHandler for TableToTableHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::TableToTable
    }

    fn apply(
        &self,
        record: &mut MatchRecord,
        actor: PlayerId,
        action: &Action,
        config: &GameConfig,
    ) -> Result<Outcome, ActionError> {
        let Action::TableToTable { source, target } = *action else {
            return Err(mismatch(self.kind()));
        };

        // Only loose cards move between table entities. Stacks and builds
        // are resolved through intents, never dragged wholesale.
        let card = match record.entity(source) {
            Some(TableEntity::Loose(lc)) => lc.card,
            Some(_) => {
                return Err(ValidationError::WrongEntityKind(source, "loose card").into())
            }
            None => return Err(ValidationError::EntityNotFound(source).into()),
        };
        let from = CardSource::TableLoose { entity: source };

        match record.entity(target) {
            Some(TableEntity::Loose(_)) => staging::start(record, actor, card, from, target),
            Some(TableEntity::Stack(_)) => staging::extend(record, actor, target, card, from),
            Some(TableEntity::Build(_)) => {
                build::extend(record, actor, target, card, from, config)
            }
            None => Err(ValidationError::EntityNotFound(target).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, PlayerPair, Rank, Suit};
    use crate::state::Build;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn record_with(hand0: Vec<Card>, table: Vec<Card>) -> MatchRecord {
        let hands = PlayerPair::new(|p| if p.index() == 0 { hand0.clone() } else { Vec::new() });
        MatchRecord::from_deal(hands, table, Vec::new())
    }

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    #[test]
    fn test_hand_drop_on_loose_starts_stack() {
        let config = GameConfig::standard();
        let four = card(Rank::Four, Suit::Clubs);
        let mut record = record_with(vec![four], vec![card(Rank::Three, Suit::Hearts)]);
        let target = record.loose_cards().next().unwrap().id;

        HandToTableHandler
            .apply(
                &mut record,
                p0(),
                &Action::HandToTable { card: four, target },
                &config,
            )
            .unwrap();
        assert_eq!(record.stack_of(p0()).unwrap().value(), 7);
    }

    #[test]
    fn test_hand_drop_on_own_build_extends() {
        let config = GameConfig::standard();
        let seven = card(Rank::Seven, Suit::Spades);
        let mut record = record_with(vec![seven], Vec::new());
        let id = record.alloc_entity();
        record.push_entity(TableEntity::Build(Build {
            id,
            owner: p0(),
            value: 7,
            cards: vec![card(Rank::Four, Suit::Clubs), card(Rank::Three, Suit::Diamonds)],
            extendable: true,
        }));

        HandToTableHandler
            .apply(
                &mut record,
                p0(),
                &Action::HandToTable { card: seven, target: id },
                &config,
            )
            .unwrap();
        assert_eq!(record.builds().next().unwrap().cards.len(), 3);
    }

    #[test]
    fn test_table_drop_merges_loose_cards() {
        let config = GameConfig::standard();
        let mut record = record_with(
            vec![card(Rank::Seven, Suit::Spades)],
            vec![card(Rank::Four, Suit::Clubs), card(Rank::Three, Suit::Hearts)],
        );
        let ids: Vec<_> = record.loose_cards().map(|lc| lc.id).collect();

        TableToTableHandler
            .apply(
                &mut record,
                p0(),
                &Action::TableToTable {
                    source: ids[0],
                    target: ids[1],
                },
                &config,
            )
            .unwrap();

        let stack = record.stack_of(p0()).unwrap();
        assert_eq!(stack.id, ids[1]);
        assert_eq!(stack.value(), 7);
        // The dragged card left its loose slot.
        assert!(record.entity(ids[0]).is_none());
    }

    #[test]
    fn test_table_drop_rejects_stack_source() {
        let config = GameConfig::standard();
        let four = card(Rank::Four, Suit::Clubs);
        let mut record = record_with(
            vec![four],
            vec![card(Rank::Three, Suit::Hearts), card(Rank::Two, Suit::Spades)],
        );
        let ids: Vec<_> = record.loose_cards().map(|lc| lc.id).collect();
        staging::start(&mut record, p0(), four, CardSource::Hand, ids[0]).unwrap();

        let err = TableToTableHandler
            .apply(
                &mut record,
                p0(),
                &Action::TableToTable {
                    source: ids[0],
                    target: ids[1],
                },
                &config,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::Validation(ValidationError::WrongEntityKind(_, "loose card"))
        ));
    }

    #[test]
    fn test_missing_target() {
        let config = GameConfig::standard();
        let four = card(Rank::Four, Suit::Clubs);
        let mut record = record_with(vec![four], Vec::new());
        let ghost = record.alloc_entity();

        let err = HandToTableHandler
            .apply(
                &mut record,
                p0(),
                &Action::HandToTable { card: four, target: ghost },
                &config,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::Validation(ValidationError::EntityNotFound(_))
        ));
    }
}
