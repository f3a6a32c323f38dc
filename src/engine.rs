//! Match lifecycle: creation, access, submission, teardown.
//!
//! `MatchManager` is the process-level owner of every live match. The
//! networking collaborator holds one manager, maps connections to
//! `(MatchId, PlayerId)` pairs, and broadcasts the record after each
//! successful submission.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::actions::{Outcome, Submission};
use crate::core::{GameConfig, PlayerId};
use crate::dealer::Dealer;
use crate::error::GameError;
use crate::resolver::{DragItem, DropTarget, Resolution};
use crate::router::ActionRouter;
use crate::state::MatchRecord;

/// Identifier for a live match, unique within one manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "match {}", self.0)
    }
}

/// Owns all live matches and routes submissions to them.
pub struct MatchManager {
    matches: FxHashMap<MatchId, MatchRecord>,
    router: ActionRouter,
    next_id: u64,
}

impl MatchManager {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            matches: FxHashMap::default(),
            router: ActionRouter::new(config),
            next_id: 0,
        }
    }

    /// Deal a new match from a seed and register it.
    pub fn create_match(&mut self, seed: u64) -> MatchId {
        let record = Dealer::new(seed).deal(self.router.config());
        let id = MatchId(self.next_id);
        self.next_id += 1;
        self.matches.insert(id, record);
        info!(%id, seed, "match created");
        id
    }

    /// Read-only access to a match record, for broadcast.
    pub fn record(&self, id: MatchId) -> Result<&MatchRecord, GameError> {
        self.matches.get(&id).ok_or(GameError::MatchNotFound(id.0))
    }

    /// Route a submission to its match.
    pub fn submit(&mut self, id: MatchId, submission: &Submission) -> Result<Outcome, GameError> {
        let record = self
            .matches
            .get_mut(&id)
            .ok_or(GameError::MatchNotFound(id.0))?;
        self.router.submit(record, submission)
    }

    /// Resolve a drop intent against a match without mutating it.
    pub fn resolve_intent(
        &self,
        id: MatchId,
        player: PlayerId,
        dragged: &DragItem,
        target: &DropTarget,
    ) -> Result<Resolution, GameError> {
        let record = self.record(id)?;
        Ok(self.router.resolve_intent(record, player, dragged, target))
    }

    /// Remove a match, returning its final record.
    pub fn teardown(&mut self, id: MatchId) -> Result<MatchRecord, GameError> {
        let record = self
            .matches
            .remove(&id)
            .ok_or(GameError::MatchNotFound(id.0))?;
        info!(%id, game_over = record.game_over, "match torn down");
        Ok(record)
    }

    /// Number of live matches.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}
