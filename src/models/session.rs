//! Quick-match session: a roster split into teams once, reshufflable.

use crate::models::player::Player;
use crate::models::team::{TeamAssignment, TeamStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// How players are split into teams.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionPolicy {
    /// Shuffle and deal; sizes balanced, skill not.
    Random,
    /// Greedy placement by descending level.
    #[default]
    Balanced,
    /// Deal each position separately so positions spread across teams.
    Position,
}

/// One generated line-up for a match day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub policy: PartitionPolicy,
    pub team_count: usize,
    /// Roster the teams were drawn from, in input order.
    pub players: Vec<Player>,
    pub teams: TeamAssignment,
    pub stats: TeamStats,
}
