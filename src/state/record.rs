//! The canonical per-match record.
//!
//! One `MatchRecord` holds the complete state of one match: both hands, the
//! table, both capture piles, the undealt deck, and the turn/round
//! bookkeeping the router needs. The multiset union of cards across those
//! four locations is the full 40-card deck at all times - handlers move
//! cards, they never create or destroy them.
//!
//! Collections use `im::Vector` so the router can clone a draft cheaply,
//! mutate it, and commit atomically only on success.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Card, PlayerId, PlayerPair, Rank};
use crate::error::ValidationError;

use super::table::{Build, CardSource, EntityId, LooseCard, StagingStack, TableEntity};

/// Outcome of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner(PlayerId),
    Draw,
}

/// Canonical mutable snapshot of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Current round, 1 or 2.
    pub round: u8,

    /// Whose turn it is.
    pub current_player: PlayerId,

    /// The table: loose cards, staging stacks, builds. Order is display
    /// layering only ("most recently placed" last), never game semantics.
    pub table: Vector<TableEntity>,

    /// Turn number, starting at 1.
    pub turn_counter: u32,

    /// Player who most recently captured. Receives the table sweep at
    /// cleanup.
    pub last_capturer: Option<PlayerId>,

    /// Set once cleanup has run; no further actions are accepted.
    pub game_over: bool,

    /// Final result, present once the game is over.
    pub winner: Option<MatchResult>,

    /// Final scores, present once the game is over.
    pub scores: Option<PlayerPair<i32>>,

    hands: PlayerPair<Vector<Card>>,
    capture_piles: PlayerPair<Vector<Card>>,
    deck: Vector<Card>,

    /// Diagnostic log: how each completed turn ended (`true` = forced
    /// switch, `false` = no legal move). Bounded by the router.
    turn_completions: Vec<bool>,

    /// Per-turn guard: has this player already staged a hand card this turn?
    /// Trips only on stack extension from hand; the hand card that starts a
    /// stack does not count against it.
    staged_hand_card: PlayerPair<bool>,

    next_entity_id: u32,
}

impl MatchRecord {
    /// Assemble a fresh record from a deal.
    ///
    /// `table_cards` become loose entities in order; `deck` is the undealt
    /// remainder (drawn from the front for the round-2 deal).
    #[must_use]
    pub fn from_deal(hands: PlayerPair<Vec<Card>>, table_cards: Vec<Card>, deck: Vec<Card>) -> Self {
        let mut record = Self {
            round: 1,
            current_player: PlayerId::new(0),
            table: Vector::new(),
            turn_counter: 1,
            last_capturer: None,
            game_over: false,
            winner: None,
            scores: None,
            hands: PlayerPair::new(|p| hands[p].iter().copied().collect()),
            capture_piles: PlayerPair::with_default(),
            deck: deck.into_iter().collect(),
            turn_completions: Vec::new(),
            staged_hand_card: PlayerPair::with_value(false),
            next_entity_id: 0,
        };
        for card in table_cards {
            record.push_loose(card);
        }
        record
    }

    // === Hands ===

    /// A player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Vector<Card> {
        &self.hands[player]
    }

    /// Whether a player holds a specific card.
    #[must_use]
    pub fn hand_contains(&self, player: PlayerId, card: Card) -> bool {
        self.hands[player].iter().any(|&c| c == card)
    }

    /// Whether a player holds any card of the given value.
    #[must_use]
    pub fn hand_has_value(&self, player: PlayerId, value: u8) -> bool {
        self.hands[player].iter().any(|c| c.value() == value)
    }

    /// Distinct card values in a player's hand, ascending.
    #[must_use]
    pub fn hand_values(&self, player: PlayerId) -> Vec<u8> {
        let mut values: Vec<u8> = self.hands[player].iter().map(|c| c.value()).collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Remove a card from a player's hand. Returns false if absent.
    pub fn remove_from_hand(&mut self, player: PlayerId, card: Card) -> bool {
        let hand = &mut self.hands[player];
        if let Some(pos) = hand.iter().position(|&c| c == card) {
            hand.remove(pos);
            true
        } else {
            false
        }
    }

    /// Add a card to a player's hand.
    pub fn add_to_hand(&mut self, player: PlayerId, card: Card) {
        self.hands[player].push_back(card);
    }

    /// True when both hands are empty (round/cleanup trigger).
    #[must_use]
    pub fn hands_empty(&self) -> bool {
        PlayerId::both().all(|p| self.hands[p].is_empty())
    }

    // === Capture piles ===

    /// A player's capture pile, in append order.
    #[must_use]
    pub fn capture_pile(&self, player: PlayerId) -> &Vector<Card> {
        &self.capture_piles[player]
    }

    /// The most recently captured card, addressable for staging sources.
    #[must_use]
    pub fn pile_top(&self, player: PlayerId) -> Option<Card> {
        self.capture_piles[player].last().copied()
    }

    /// Withdraw the top card of a player's pile.
    pub fn pop_pile_top(&mut self, player: PlayerId) -> Option<Card> {
        self.capture_piles[player].pop_back()
    }

    /// Append a captured card (becomes the new top).
    pub fn append_to_pile(&mut self, player: PlayerId, card: Card) {
        self.capture_piles[player].push_back(card);
    }

    // === Deck ===

    /// Undealt cards remaining.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    /// Deal both hands up to `hand_size` from the front of the deck
    /// (round-2 re-deal).
    pub fn deal_hands(&mut self, hand_size: usize) {
        for _ in 0..hand_size {
            for player in PlayerId::both() {
                if let Some(card) = self.deck.pop_front() {
                    self.hands[player].push_back(card);
                }
            }
        }
    }

    // === Table entities ===

    /// Allocate a fresh entity ID.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Append a card to the table as a loose entity.
    pub fn push_loose(&mut self, card: Card) -> EntityId {
        let id = self.alloc_entity();
        self.table.push_back(TableEntity::Loose(LooseCard { id, card }));
        id
    }

    /// Append an entity to the table.
    pub fn push_entity(&mut self, entity: TableEntity) {
        self.table.push_back(entity);
    }

    /// Look up an entity by ID.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&TableEntity> {
        self.table.iter().find(|e| e.id() == id)
    }

    /// Remove an entity from the table, returning it.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<TableEntity> {
        let pos = self.table.iter().position(|e| e.id() == id)?;
        Some(self.table.remove(pos))
    }

    /// Replace an entity in place, preserving its table position.
    /// Returns false if the ID is not on the table.
    pub fn replace_entity(&mut self, id: EntityId, entity: TableEntity) -> bool {
        if let Some(pos) = self.table.iter().position(|e| e.id() == id) {
            self.table.set(pos, entity);
            true
        } else {
            false
        }
    }

    /// Iterate over loose cards on the table.
    pub fn loose_cards(&self) -> impl Iterator<Item = &LooseCard> {
        self.table.iter().filter_map(|e| match e {
            TableEntity::Loose(lc) => Some(lc),
            _ => None,
        })
    }

    /// Whether a loose card of the given rank is on the table.
    #[must_use]
    pub fn loose_rank_on_table(&self, rank: Rank) -> bool {
        self.loose_cards().any(|lc| lc.card.rank == rank)
    }

    /// A player's open staging stack, if any. At most one exists.
    #[must_use]
    pub fn stack_of(&self, player: PlayerId) -> Option<&StagingStack> {
        self.table.iter().find_map(|e| match e {
            TableEntity::Stack(st) if st.owner == player => Some(st),
            _ => None,
        })
    }

    /// Whether a player owns any build on the table.
    #[must_use]
    pub fn owns_build(&self, player: PlayerId) -> bool {
        self.builds().any(|b| b.owner == player)
    }

    /// Iterate over builds on the table.
    pub fn builds(&self) -> impl Iterator<Item = &Build> {
        self.table.iter().filter_map(|e| match e {
            TableEntity::Build(b) => Some(b),
            _ => None,
        })
    }

    /// Remove every entity from the table, returning all contained cards
    /// in table order (cleanup sweep).
    pub fn clear_table(&mut self) -> Vec<Card> {
        let cards: Vec<Card> = self.table.iter().flat_map(TableEntity::cards).collect();
        self.table.clear();
        cards
    }

    // === Card sources ===

    /// Validate that `card` sits at `source` for `actor` and remove it.
    ///
    /// This is the single chokepoint through which handlers consume cards,
    /// so the "card occupies exactly one location" invariant only has to be
    /// argued here.
    pub fn take_card(
        &mut self,
        actor: PlayerId,
        card: Card,
        source: CardSource,
    ) -> Result<(), ValidationError> {
        match source {
            CardSource::Hand => {
                if self.remove_from_hand(actor, card) {
                    Ok(())
                } else {
                    Err(ValidationError::CardNotInHand(card))
                }
            }
            CardSource::TableLoose { entity } => match self.entity(entity) {
                Some(TableEntity::Loose(lc)) if lc.card == card => {
                    self.remove_entity(entity);
                    Ok(())
                }
                _ => Err(ValidationError::CardNotAtSource(card)),
            },
            CardSource::OwnPile => self.take_pile_top(actor, card),
            CardSource::OpponentPile => self.take_pile_top(actor.opponent(), card),
        }
    }

    fn take_pile_top(&mut self, pile_owner: PlayerId, card: Card) -> Result<(), ValidationError> {
        if self.pile_top(pile_owner) == Some(card) {
            self.pop_pile_top(pile_owner);
            Ok(())
        } else {
            Err(ValidationError::CardNotAtSource(card))
        }
    }

    // === Turn bookkeeping ===

    /// Whether the player has already staged a hand card this turn.
    #[must_use]
    pub fn hand_card_staged(&self, player: PlayerId) -> bool {
        self.staged_hand_card[player]
    }

    /// Trip the one-hand-card-per-turn staging guard.
    pub fn mark_hand_card_staged(&mut self, player: PlayerId) {
        self.staged_hand_card[player] = true;
    }

    /// Reset per-turn guards (on turn switch and round transition).
    pub fn reset_turn_guards(&mut self) {
        self.staged_hand_card = PlayerPair::with_value(false);
    }

    /// Record how the just-ended turn completed, capped at `cap` entries.
    pub fn record_turn_completion(&mut self, forced: bool, cap: usize) {
        if self.turn_completions.len() < cap {
            self.turn_completions.push(forced);
        }
    }

    /// The bounded turn-completion log.
    #[must_use]
    pub fn turn_completions(&self) -> &[bool] {
        &self.turn_completions
    }

    /// Toggle the current player, reset guards, advance the turn counter.
    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opponent();
        self.reset_turn_guards();
        self.turn_counter += 1;
    }

    // === Invariant support ===

    /// Every card in the record, across hands, table, piles, and deck.
    ///
    /// Sorted so tests can compare against the full deck directly.
    #[must_use]
    pub fn card_census(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = Vec::new();
        for player in PlayerId::both() {
            cards.extend(self.hands[player].iter().copied());
            cards.extend(self.capture_piles[player].iter().copied());
        }
        for entity in &self.table {
            cards.extend(entity.cards());
        }
        cards.extend(self.deck.iter().copied());
        cards.sort();
        cards
    }
}
