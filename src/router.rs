//! The action router: turn order, atomic commits, turn and round policy.
//!
//! A match moves through dealing, round-1 play, the round-2 re-deal, round-2
//! play, and cleanup. The router owns everything between the deal and the
//! final scores: it gates submissions on turn order, runs the registered
//! handler against a cloned draft of the record, commits the draft only on
//! success, and then applies the turn and round policies.
//!
//! Cloning the record is cheap (persistent collections), so a failing
//! handler can never leave a half-applied action behind.

use tracing::{debug, info};

use crate::actions::{HandlerRegistry, Outcome, Submission};
use crate::core::{GameConfig, PlayerId};
use crate::error::{GameError, ValidationError};
use crate::resolver::{DragItem, DragSource, DropTarget, MoveResolver, Resolution};
use crate::scoring::score_match;
use crate::state::MatchRecord;

pub struct ActionRouter {
    registry: HandlerRegistry,
    resolver: MoveResolver,
    config: GameConfig,
}

impl ActionRouter {
    /// A router with the standard rule set.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_registry(config, HandlerRegistry::standard())
    }

    /// A router with a custom handler registry.
    #[must_use]
    pub fn with_registry(config: GameConfig, registry: HandlerRegistry) -> Self {
        Self {
            registry,
            resolver: MoveResolver::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Execute a submission against the record.
    ///
    /// On any error the record is untouched. On success the handler's
    /// mutation is committed and the turn and round policies run, which may
    /// switch the player, re-deal for round 2, or finish the match.
    pub fn submit(
        &self,
        record: &mut MatchRecord,
        submission: &Submission,
    ) -> Result<Outcome, GameError> {
        let kind = submission.action.kind();

        if record.game_over {
            return Err(GameError::from_action(
                kind,
                ValidationError::MatchOver.into(),
            ));
        }
        if submission.actor != record.current_player {
            return Err(GameError::from_action(
                kind,
                ValidationError::OutOfTurn(submission.actor).into(),
            ));
        }
        let handler = self
            .registry
            .get(kind)
            .ok_or(GameError::UnknownAction(kind))?;

        let mut draft = record.clone();
        let outcome = handler
            .apply(&mut draft, submission.actor, &submission.action, &self.config)
            .map_err(|err| GameError::from_action(kind, err))?;
        *record = draft;

        debug!(
            actor = %submission.actor,
            action = %kind,
            turn = record.turn_counter,
            force_switch = outcome.force_switch,
            "action applied"
        );

        self.apply_turn_policy(record, outcome);
        self.apply_round_policy(record);
        Ok(outcome)
    }

    /// Pure query: resolve a drop intent into candidate actions.
    #[must_use]
    pub fn resolve_intent(
        &self,
        record: &MatchRecord,
        player: PlayerId,
        dragged: &DragItem,
        target: &DropTarget,
    ) -> Resolution {
        self.resolver.resolve(record, player, dragged, target)
    }

    /// Whether the player has any legal move left this turn.
    ///
    /// Probes the resolver with every hand card against the open table and
    /// every entity. An open staging stack always counts (it can be
    /// cancelled). Pile-top drags are not probed: the stuck check reads
    /// only the remaining hand and table state, so a player whose sole
    /// option is pulling from a capture pile is switched away.
    #[must_use]
    pub fn player_can_move(&self, record: &MatchRecord, player: PlayerId) -> bool {
        if record.stack_of(player).is_some() {
            return true;
        }
        let entity_ids: Vec<_> = record.table.iter().map(|e| e.id()).collect();
        for &card in record.hand(player) {
            let dragged = DragItem {
                card,
                source: DragSource::Hand,
            };
            if !self
                .resolver
                .resolve(record, player, &dragged, &DropTarget::OpenTable)
                .is_empty()
            {
                return true;
            }
            for &id in &entity_ids {
                if !self
                    .resolver
                    .resolve(record, player, &dragged, &DropTarget::Entity(id))
                    .is_empty()
                {
                    return true;
                }
            }
        }
        false
    }

    fn apply_turn_policy(&self, record: &mut MatchRecord, outcome: Outcome) {
        if outcome.force_switch || !self.player_can_move(record, record.current_player) {
            record.record_turn_completion(outcome.force_switch, self.config.max_turn_flags);
            record.switch_player();
        }
    }

    fn apply_round_policy(&self, record: &mut MatchRecord) {
        if !record.hands_empty() {
            return;
        }

        if record.round == 1 {
            record.deal_hands(self.config.hand_size);
            record.round = 2;
            record.reset_turn_guards();
            info!(
                turn = record.turn_counter,
                deck = record.deck_size(),
                "round 2 dealt"
            );
        } else {
            // Cleanup: the table sweeps to whoever captured last; if nobody
            // ever captured, to the player whose turn it would be.
            let receiver = record.last_capturer.unwrap_or(record.current_player);
            for card in record.clear_table() {
                record.append_to_pile(receiver, card);
            }
            let (scores, result) = score_match(record);
            record.scores = Some(scores);
            record.winner = Some(result);
            record.game_over = true;
            info!(
                turn = record.turn_counter,
                sweep_to = %receiver,
                result = ?result,
                "match finished"
            );
        }
    }
}
