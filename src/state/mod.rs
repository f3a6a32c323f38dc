//! Match state: table entities and the canonical per-match record.

pub mod record;
pub mod table;

pub use record::{MatchRecord, MatchResult};
pub use table::{Build, CardSource, EntityId, LooseCard, StagingStack, TableEntity};
