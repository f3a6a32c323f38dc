//! Move resolution: from raw drop intents to concrete actions.
//!
//! The UI reports only "this item was dropped on that target". The resolver
//! evaluates the priority rules (same-value match, staging-stack
//! composition via sequential grouping, total-sum match, ownership-based
//! build extension) and returns every legal concrete `Action`. One legal
//! action is auto-selectable; more than one sets `requires_modal` so the UI
//! can present a choice and resubmit the selected action.
//!
//! The resolver is a pure query: it never mutates the record. Turn order is
//! the router's concern, not the resolver's.

pub mod grouping;

pub use grouping::{first_grouping, interpretation_count, partition_for_value, CardGroup, Grouping};

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::core::{Card, PlayerId};
use crate::state::{Build, CardSource, EntityId, LooseCard, MatchRecord, StagingStack, TableEntity};

/// Where the dragged item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSource {
    Hand,
    /// A table entity (a loose card, or a staging stack dragged onto a
    /// target to request its resolution).
    Table(EntityId),
    OwnPile,
    OpponentPile,
}

/// The dragged item as reported by the UI collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem {
    pub card: Card,
    pub source: DragSource,
}

/// What the item was dropped on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    /// Empty table space.
    OpenTable,
    /// An existing table entity.
    Entity(EntityId),
}

/// One legal interpretation of a drop, with a display label for the modal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    pub label: String,
    pub action: Action,
}

/// The resolver's answer: all legal candidate actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub options: Vec<MoveOption>,
    /// True when more than one legal action exists and the UI must ask.
    pub requires_modal: bool,
}

impl Resolution {
    fn from_options(options: Vec<MoveOption>) -> Self {
        let requires_modal = options.len() > 1;
        Self {
            options,
            requires_modal,
        }
    }

    fn none() -> Self {
        Self::from_options(Vec::new())
    }

    /// No legal interpretation; the UI should reset the drag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The single legal action, when no modal is required.
    #[must_use]
    pub fn single(&self) -> Option<&Action> {
        if self.options.len() == 1 {
            Some(&self.options[0].action)
        } else {
            None
        }
    }

    /// The candidate actions in option order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.options.iter().map(|o| &o.action)
    }
}

fn to_card_source(source: DragSource) -> CardSource {
    match source {
        DragSource::Hand => CardSource::Hand,
        DragSource::Table(entity) => CardSource::TableLoose { entity },
        DragSource::OwnPile => CardSource::OwnPile,
        DragSource::OpponentPile => CardSource::OpponentPile,
    }
}

/// Evaluates drop intents against the rule set. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveResolver;

impl MoveResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a drop intent into its legal candidate actions.
    #[must_use]
    pub fn resolve(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        dragged: &DragItem,
        target: &DropTarget,
    ) -> Resolution {
        if record.game_over {
            return Resolution::none();
        }

        match target {
            DropTarget::OpenTable => self.resolve_open_table(record, player, dragged),
            DropTarget::Entity(id) => match record.entity(*id) {
                Some(TableEntity::Loose(lc)) => self.resolve_on_loose(record, player, dragged, lc),
                Some(TableEntity::Stack(st)) => self.resolve_on_stack(record, player, dragged, st),
                Some(TableEntity::Build(b)) => self.resolve_on_build(record, player, dragged, b),
                None => Resolution::none(),
            },
        }
    }

    /// Hand card dropped on empty table space: a trail, when legal.
    fn resolve_open_table(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        dragged: &DragItem,
    ) -> Resolution {
        if dragged.source != DragSource::Hand
            || !record.hand_contains(player, dragged.card)
            || record.loose_rank_on_table(dragged.card.rank)
            || (record.round == 1 && record.owns_build(player))
        {
            return Resolution::none();
        }
        Resolution::from_options(vec![MoveOption {
            label: format!("trail {}", dragged.card),
            action: Action::Trail { card: dragged.card },
        }])
    }

    /// Drop on a loose card: same-value capture, build declaration, or
    /// staging-stack creation.
    fn resolve_on_loose(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        dragged: &DragItem,
        target: &LooseCard,
    ) -> Resolution {
        let dv = dragged.card.value();
        let tv = target.card.value();
        let mut options = Vec::new();

        if dragged.source == DragSource::Hand && record.hand_contains(player, dragged.card) {
            if dv == tv {
                // Capture every matching loose card at once.
                let targets: Vec<EntityId> = record
                    .loose_cards()
                    .filter(|lc| lc.card.rank == target.card.rank)
                    .map(|lc| lc.id)
                    .collect();
                options.push(MoveOption {
                    label: format!("capture {dv}"),
                    action: Action::Capture {
                        card: dragged.card,
                        source: CardSource::Hand,
                        targets,
                    },
                });

                // Same-value build: needs a second card of this value left
                // in hand to capture with later.
                if hand_has_value_besides(record, player, dragged.card, dv) {
                    options.push(MoveOption {
                        label: format!("build {dv}"),
                        action: Action::CreateBuild {
                            card: dragged.card,
                            target: target.id,
                            value: dv,
                        },
                    });
                }
            }

            // Sum build: the two cards add to a value held in hand.
            let sum = dv + tv;
            if sum <= 10 && hand_has_value_besides(record, player, dragged.card, sum) {
                options.push(MoveOption {
                    label: format!("build {sum}"),
                    action: Action::CreateBuild {
                        card: dragged.card,
                        target: target.id,
                        value: sum,
                    },
                });
            }
        }

        // No capture or build matched: the drop composes a staging stack.
        if options.is_empty() && record.stack_of(player).is_none() {
            let available = match dragged.source {
                DragSource::Hand => record.hand_contains(player, dragged.card),
                DragSource::Table(id) => {
                    id != target.id
                        && matches!(record.entity(id), Some(TableEntity::Loose(lc)) if lc.card == dragged.card)
                }
                DragSource::OwnPile => record.pile_top(player) == Some(dragged.card),
                DragSource::OpponentPile => {
                    record.pile_top(player.opponent()) == Some(dragged.card)
                }
            };
            if available {
                options.push(MoveOption {
                    label: "stage".to_string(),
                    action: Action::StartStaging {
                        card: dragged.card,
                        source: to_card_source(dragged.source),
                        target: target.id,
                    },
                });
            }
        }

        Resolution::from_options(options)
    }

    /// Drop on (or resolution of) the player's own staging stack.
    fn resolve_on_stack(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        dragged: &DragItem,
        stack: &StagingStack,
    ) -> Resolution {
        if stack.owner != player {
            return Resolution::none();
        }

        // The stack dropped on itself requests resolution of its contents.
        if dragged.source == DragSource::Table(stack.id) {
            return self.resolve_stack_composition(record, player, stack);
        }

        // Otherwise a card is being added.
        match dragged.source {
            DragSource::Hand => {
                if !record.hand_contains(player, dragged.card) || record.hand_card_staged(player) {
                    return Resolution::none();
                }
            }
            DragSource::Table(id) => {
                let ok = matches!(record.entity(id), Some(TableEntity::Loose(lc)) if lc.card == dragged.card);
                if !ok {
                    return Resolution::none();
                }
            }
            DragSource::OwnPile => {
                if record.pile_top(player) != Some(dragged.card) {
                    return Resolution::none();
                }
            }
            DragSource::OpponentPile => {
                if record.pile_top(player.opponent()) != Some(dragged.card) {
                    return Resolution::none();
                }
            }
        }

        // The handler converts an equal-value hand card into an immediate
        // capture; the action submitted is the same either way.
        Resolution::from_options(vec![MoveOption {
            label: "add to stack".to_string(),
            action: Action::ExtendStaging {
                stack: stack.id,
                card: dragged.card,
                source: to_card_source(dragged.source),
            },
        }])
    }

    /// Staging-stack composition: the same-value, sequential-grouping, and
    /// total-sum rules, in priority order.
    fn resolve_stack_composition(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        stack: &StagingStack,
    ) -> Resolution {
        let mut options = Vec::new();
        let mut offered_build_values: Vec<u8> = Vec::new();

        // Same-value rule: a uniform-rank stack may be captured by rank or
        // declared as a same-value build.
        if stack.uniform_rank() {
            let value = stack.cards[0].value();
            if let Some(card) = hand_card_of_value(record, player, value) {
                options.push(MoveOption {
                    label: format!("capture {value}"),
                    action: Action::Capture {
                        card,
                        source: CardSource::Hand,
                        targets: vec![stack.id],
                    },
                });
                options.push(MoveOption {
                    label: format!("build {value}"),
                    action: Action::FinalizeBuild {
                        stack: stack.id,
                        value,
                    },
                });
                offered_build_values.push(value);
            }
        }

        // Sequential grouping: lowest hand value that partitions the stack.
        let hand_values = record.hand_values(player);
        if let Some(grouping) = first_grouping(&stack.cards, &hand_values) {
            if !offered_build_values.contains(&grouping.value) {
                options.push(MoveOption {
                    label: format!("build {}", grouping.value),
                    action: Action::FinalizeBuild {
                        stack: stack.id,
                        value: grouping.value,
                    },
                });
                offered_build_values.push(grouping.value);
            }
        } else {
            // Total-sum rule only applies when grouping found nothing.
            let sum = stack.value();
            if sum <= 10 {
                if let Some(card) = hand_card_of_value(record, player, sum) {
                    options.push(MoveOption {
                        label: format!("capture {sum}"),
                        action: Action::Capture {
                            card,
                            source: CardSource::Hand,
                            targets: vec![stack.id],
                        },
                    });
                }
            }
        }

        Resolution::from_options(options)
    }

    /// Drop on a build: exact-value capture, plus extension for the owner.
    fn resolve_on_build(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        dragged: &DragItem,
        build: &Build,
    ) -> Resolution {
        if dragged.card.value() != build.value {
            return Resolution::none();
        }
        let available = match dragged.source {
            DragSource::Hand => record.hand_contains(player, dragged.card),
            DragSource::OwnPile => record.pile_top(player) == Some(dragged.card),
            DragSource::OpponentPile => record.pile_top(player.opponent()) == Some(dragged.card),
            DragSource::Table(_) => false,
        };
        if !available {
            return Resolution::none();
        }

        let mut options = vec![MoveOption {
            label: format!("capture {}", build.value),
            action: Action::Capture {
                card: dragged.card,
                source: to_card_source(dragged.source),
                targets: vec![build.id],
            },
        }];

        if build.owner == player && build.extendable {
            options.push(MoveOption {
                label: format!("extend build {}", build.value),
                action: Action::ExtendBuild {
                    build: build.id,
                    card: dragged.card,
                    source: to_card_source(dragged.source),
                },
            });
        }

        Resolution::from_options(options)
    }
}

/// First hand card with the given value, if any.
fn hand_card_of_value(record: &MatchRecord, player: PlayerId, value: u8) -> Option<Card> {
    record
        .hand(player)
        .iter()
        .find(|c| c.value() == value)
        .copied()
}

/// Whether the hand holds a card of `value` other than `used` itself.
fn hand_has_value_besides(record: &MatchRecord, player: PlayerId, used: Card, value: u8) -> bool {
    record
        .hand(player)
        .iter()
        .any(|&c| c != used && c.value() == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerPair, Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn record_with(p0_hand: Vec<Card>, table: Vec<Card>) -> MatchRecord {
        let hands = PlayerPair::new(|p| if p.index() == 0 { p0_hand.clone() } else { vec![] });
        MatchRecord::from_deal(hands, table, Vec::new())
    }

    #[test]
    fn test_trail_resolution() {
        let record = record_with(
            vec![card(Rank::Six, Suit::Clubs)],
            vec![card(Rank::Nine, Suit::Hearts)],
        );
        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Six, Suit::Clubs),
            source: DragSource::Hand,
        };

        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::OpenTable,
        );
        assert_eq!(resolution.options.len(), 1);
        assert!(!resolution.requires_modal);
        assert!(matches!(resolution.single(), Some(Action::Trail { .. })));
    }

    #[test]
    fn test_trail_blocked_by_duplicate_rank() {
        let record = record_with(
            vec![card(Rank::Nine, Suit::Clubs)],
            vec![card(Rank::Nine, Suit::Hearts)],
        );
        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Nine, Suit::Clubs),
            source: DragSource::Hand,
        };

        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::OpenTable,
        );
        assert!(resolution.is_empty());
    }

    #[test]
    fn test_scenario_a_modal() {
        // hand = [5♦, 5♠, 10♥], table = [5♣]; dragging 5♦ onto 5♣ must
        // offer capture 5, build 5, and build 10.
        let record = record_with(
            vec![
                card(Rank::Five, Suit::Diamonds),
                card(Rank::Five, Suit::Spades),
                card(Rank::Ten, Suit::Hearts),
            ],
            vec![card(Rank::Five, Suit::Clubs)],
        );
        let target_id = record.loose_cards().next().unwrap().id;
        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Five, Suit::Diamonds),
            source: DragSource::Hand,
        };

        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(target_id),
        );

        assert!(resolution.requires_modal);
        assert!(resolution
            .actions()
            .any(|a| matches!(a, Action::Capture { .. })));
        assert!(resolution
            .actions()
            .any(|a| matches!(a, Action::CreateBuild { value: 5, .. })));
        assert!(resolution
            .actions()
            .any(|a| matches!(a, Action::CreateBuild { value: 10, .. })));
    }

    #[test]
    fn test_unmatched_drop_stages() {
        let record = record_with(
            vec![card(Rank::Two, Suit::Clubs)],
            vec![card(Rank::Nine, Suit::Hearts)],
        );
        let target_id = record.loose_cards().next().unwrap().id;
        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Two, Suit::Clubs),
            source: DragSource::Hand,
        };

        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(target_id),
        );
        assert!(!resolution.requires_modal);
        assert!(matches!(
            resolution.single(),
            Some(Action::StartStaging { .. })
        ));
    }

    #[test]
    fn test_capture_gathers_all_matching_loose() {
        let record = record_with(
            vec![card(Rank::Seven, Suit::Clubs)],
            vec![
                card(Rank::Seven, Suit::Hearts),
                card(Rank::Two, Suit::Clubs),
                card(Rank::Seven, Suit::Diamonds),
            ],
        );
        let target_id = record.loose_cards().next().unwrap().id;
        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Seven, Suit::Clubs),
            source: DragSource::Hand,
        };

        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(target_id),
        );
        match resolution.single() {
            Some(Action::Capture { targets, .. }) => assert_eq!(targets.len(), 2),
            other => panic!("expected capture, got {other:?}"),
        }
    }

    #[test]
    fn test_scenario_b_grouping_resolution() {
        // Stack [7,4,3] with a 7 in hand resolves to build 7.
        let mut record = record_with(vec![card(Rank::Seven, Suit::Spades)], vec![]);
        let id = record.alloc_entity();
        record.push_entity(TableEntity::Stack(StagingStack {
            id,
            owner: PlayerId::new(0),
            cards: vec![
                card(Rank::Seven, Suit::Hearts),
                card(Rank::Four, Suit::Clubs),
                card(Rank::Three, Suit::Diamonds),
            ],
        }));

        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Seven, Suit::Hearts),
            source: DragSource::Table(id),
        };
        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(id),
        );

        assert!(matches!(
            resolution.single(),
            Some(Action::FinalizeBuild { value: 7, .. })
        ));
    }

    #[test]
    fn test_total_sum_rule_when_grouping_fails() {
        // Stack [2,3,1,4] sums to 10 but no contiguous grouping reaches 10
        // (groups are at most 3 cards), so the 10 in hand sum-captures it.
        let mut record = record_with(vec![card(Rank::Ten, Suit::Spades)], vec![]);
        let id = record.alloc_entity();
        record.push_entity(TableEntity::Stack(StagingStack {
            id,
            owner: PlayerId::new(0),
            cards: vec![
                card(Rank::Two, Suit::Hearts),
                card(Rank::Three, Suit::Clubs),
                card(Rank::Ace, Suit::Diamonds),
                card(Rank::Four, Suit::Spades),
            ],
        }));

        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Two, Suit::Hearts),
            source: DragSource::Table(id),
        };
        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(id),
        );

        match resolution.single() {
            Some(Action::Capture { card: c, targets, .. }) => {
                assert_eq!(c.value(), 10);
                assert_eq!(targets, &vec![id]);
            }
            other => panic!("expected sum capture, got {other:?}"),
        }
    }

    #[test]
    fn test_same_value_stack_modal() {
        // Stack [5,5] with another 5 in hand: capture or same-value build.
        let mut record = record_with(vec![card(Rank::Five, Suit::Spades)], vec![]);
        let id = record.alloc_entity();
        record.push_entity(TableEntity::Stack(StagingStack {
            id,
            owner: PlayerId::new(0),
            cards: vec![card(Rank::Five, Suit::Hearts), card(Rank::Five, Suit::Clubs)],
        }));

        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Five, Suit::Hearts),
            source: DragSource::Table(id),
        };
        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(id),
        );

        assert!(resolution.requires_modal);
        assert!(resolution.actions().any(|a| matches!(a, Action::Capture { .. })));
        assert!(resolution
            .actions()
            .any(|a| matches!(a, Action::FinalizeBuild { value: 5, .. })));
    }

    #[test]
    fn test_build_capture_and_extend_modal() {
        let mut record = record_with(
            vec![card(Rank::Seven, Suit::Spades), card(Rank::Seven, Suit::Clubs)],
            vec![],
        );
        let id = record.alloc_entity();
        record.push_entity(TableEntity::Build(Build {
            id,
            owner: PlayerId::new(0),
            value: 7,
            cards: vec![card(Rank::Four, Suit::Clubs), card(Rank::Three, Suit::Hearts)],
            extendable: true,
        }));

        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Seven, Suit::Spades),
            source: DragSource::Hand,
        };
        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(id),
        );

        assert!(resolution.requires_modal);
        assert!(resolution.actions().any(|a| matches!(a, Action::Capture { .. })));
        assert!(resolution
            .actions()
            .any(|a| matches!(a, Action::ExtendBuild { .. })));
    }

    #[test]
    fn test_opponent_stack_untouchable() {
        let mut record = record_with(vec![card(Rank::Five, Suit::Spades)], vec![]);
        let id = record.alloc_entity();
        record.push_entity(TableEntity::Stack(StagingStack {
            id,
            owner: PlayerId::new(1),
            cards: vec![card(Rank::Five, Suit::Hearts), card(Rank::Five, Suit::Clubs)],
        }));

        let resolver = MoveResolver::new();
        let dragged = DragItem {
            card: card(Rank::Five, Suit::Spades),
            source: DragSource::Hand,
        };
        let resolution = resolver.resolve(
            &record,
            PlayerId::new(0),
            &dragged,
            &DropTarget::Entity(id),
        );
        assert!(resolution.is_empty());
    }
}
