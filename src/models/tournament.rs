//! Tournament aggregate, configuration, pools, and TournamentError.

use crate::models::game::{Match, MatchId, RoundName};
use crate::models::standings::StandingsRecord;
use crate::models::team::TeamKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Errors that can occur during team balancing and tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer players than teams requested.
    InsufficientPlayers { players: usize, teams: usize },
    /// A partition needs at least 2 teams.
    InvalidTeamCount(usize),
    /// A round-robin needs at least 2 teams.
    InvalidSchedule { teams: usize },
    /// Pool count is zero, too large, or would leave a pool empty.
    InvalidPoolConfig { pools: usize, teams: usize },
    /// A bracket needs at least 2 entrants.
    InvalidBracket { teams: usize },
    /// Not every match of the round has a winner.
    RoundIncomplete,
    /// Winner is not one of the match's two teams.
    InvalidWinner(TeamKey),
    /// The match already has a result.
    MatchAlreadyPlayed(MatchId),
    /// Tournament configuration rejected before anything was generated.
    InvalidConfig(String),
    /// Tournament is not in a phase that allows this action.
    InvalidState,
    /// Tournament is finished and can no longer change.
    ReadOnly,
    MatchNotFound(MatchId),
    TeamNotFound(TeamKey),
    PoolNotFound(PoolKey),
    /// A roster row could not be read.
    InvalidRoster(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientPlayers { players, teams } => {
                write!(f, "Need at least {} players for {} teams (got {})", teams, teams, players)
            }
            TournamentError::InvalidTeamCount(n) => write!(f, "Need at least 2 teams (got {})", n),
            TournamentError::InvalidSchedule { teams } => {
                write!(f, "Need at least 2 teams to build a schedule (got {})", teams)
            }
            TournamentError::InvalidPoolConfig { pools, teams } => {
                write!(f, "Cannot split {} teams into {} pools", teams, pools)
            }
            TournamentError::InvalidBracket { teams } => {
                write!(f, "Need at least 2 teams to build a bracket (got {})", teams)
            }
            TournamentError::RoundIncomplete => write!(f, "Not all matches have a result"),
            TournamentError::InvalidWinner(key) => {
                write!(f, "{} did not play in this match", key)
            }
            TournamentError::MatchAlreadyPlayed(id) => write!(f, "Match {} was already played", id),
            TournamentError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::ReadOnly => write!(f, "Tournament is finished"),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::TeamNotFound(key) => write!(f, "Team {} not found", key),
            TournamentError::PoolNotFound(key) => write!(f, "Pool {} not found", key),
            TournamentError::InvalidRoster(msg) => write!(f, "Invalid roster: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Smallest and largest supported tournament.
pub const MIN_TEAMS: usize = 2;
pub const MAX_TEAMS: usize = 16;
/// Bounds for `qualified_per_pool`.
pub const MAX_QUALIFIED_PER_POOL: usize = 4;

/// Pool identifier, assigned in fixed order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum PoolKey {
    #[serde(rename = "poolA")]
    PoolA,
    #[serde(rename = "poolB")]
    PoolB,
    #[serde(rename = "poolC")]
    PoolC,
    #[serde(rename = "poolD")]
    PoolD,
}

impl PoolKey {
    pub const ALL: [PoolKey; 4] = [PoolKey::PoolA, PoolKey::PoolB, PoolKey::PoolC, PoolKey::PoolD];

    pub fn as_str(self) -> &'static str {
        match self {
            PoolKey::PoolA => "poolA",
            PoolKey::PoolB => "poolB",
            PoolKey::PoolC => "poolC",
            PoolKey::PoolD => "poolD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for PoolKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Competition format chosen at creation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Single round-robin over all teams.
    #[default]
    League,
    /// Pool round-robins followed by a knockout bracket.
    Pools,
}

/// Current phase. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    #[default]
    League,
    Pools,
    Knockout,
    /// Read-only from here on.
    Finished,
}

/// Creation-time configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: TournamentFormat,
    pub team_count: usize,
    /// Display names by team key; missing keys fall back to the key itself.
    #[serde(default)]
    pub team_names: HashMap<TeamKey, String>,
    #[serde(default)]
    pub pool_count: Option<usize>,
    #[serde(default)]
    pub qualified_per_pool: Option<usize>,
}

impl TournamentConfig {
    pub fn league(name: impl Into<String>, team_count: usize) -> Self {
        Self {
            name: name.into(),
            format: TournamentFormat::League,
            team_count,
            ..Self::default()
        }
    }

    pub fn pools(
        name: impl Into<String>,
        team_count: usize,
        pool_count: usize,
        qualified_per_pool: usize,
    ) -> Self {
        Self {
            name: name.into(),
            format: TournamentFormat::Pools,
            team_count,
            pool_count: Some(pool_count),
            qualified_per_pool: Some(qualified_per_pool),
            ..Self::default()
        }
    }

    /// Check bounds and pool feasibility before anything is generated.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if !(MIN_TEAMS..=MAX_TEAMS).contains(&self.team_count) {
            return Err(TournamentError::InvalidConfig(format!(
                "team count must be between {} and {} (got {})",
                MIN_TEAMS, MAX_TEAMS, self.team_count
            )));
        }
        if self.format == TournamentFormat::League {
            return Ok(());
        }
        let pools = self
            .pool_count
            .ok_or_else(|| TournamentError::InvalidConfig("pool count is required".into()))?;
        if pools != 2 && pools != 4 {
            return Err(TournamentError::InvalidConfig(format!(
                "pool count must be 2 or 4 (got {})",
                pools
            )));
        }
        let qualified = self.qualified_per_pool.ok_or_else(|| {
            TournamentError::InvalidConfig("qualified teams per pool is required".into())
        })?;
        if !(1..=MAX_QUALIFIED_PER_POOL).contains(&qualified) {
            return Err(TournamentError::InvalidConfig(format!(
                "qualified teams per pool must be between 1 and {} (got {})",
                MAX_QUALIFIED_PER_POOL, qualified
            )));
        }
        let smallest = pool_sizes(self.team_count, pools)
            .into_iter()
            .min()
            .unwrap_or(0);
        if smallest < 2 {
            return Err(TournamentError::InvalidConfig(format!(
                "{} teams leave a pool with fewer than 2 teams across {} pools",
                self.team_count, pools
            )));
        }
        if smallest < qualified {
            return Err(TournamentError::InvalidConfig(format!(
                "cannot qualify {} teams from a pool of {}",
                qualified, smallest
            )));
        }
        if pools * qualified < 2 {
            return Err(TournamentError::InvalidConfig(
                "at least 2 teams must qualify for the knockout".into(),
            ));
        }
        Ok(())
    }
}

/// Sizes produced by slicing `teams` into `pools` groups of `ceil(teams / pools)`, the
/// last group taking the remainder. Zero-sized trailing pools are included.
pub fn pool_sizes(teams: usize, pools: usize) -> Vec<usize> {
    if pools == 0 {
        return Vec::new();
    }
    let per_pool = teams.div_ceil(pools);
    (0..pools)
        .map(|i| teams.saturating_sub(i * per_pool).min(per_pool))
        .collect()
}

/// One pool: its teams, its own schedule, and its own standings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub teams: Vec<TeamKey>,
    pub matches: Vec<Match>,
    pub standings: HashMap<TeamKey, StandingsRecord>,
}

/// One knockout round and its matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutRound {
    pub name: RoundName,
    pub matches: Vec<Match>,
}

/// Full tournament state. Operations take it by reference and return a new value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub phase: TournamentPhase,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// All team keys in creation order.
    pub team_keys: Vec<TeamKey>,
    pub team_names: HashMap<TeamKey, String>,
    /// League schedule (empty for pools format).
    pub matches: Vec<Match>,
    /// League standings (empty for pools format).
    pub standings: HashMap<TeamKey, StandingsRecord>,
    pub pool_count: Option<usize>,
    pub qualified_per_pool: Option<usize>,
    pub pools: BTreeMap<PoolKey, Pool>,
    /// Knockout rounds generated so far; the last one is being played.
    pub knockout_rounds: Vec<KnockoutRound>,
    pub champion: Option<TeamKey>,
}

impl Tournament {
    pub fn is_finished(&self) -> bool {
        self.phase == TournamentPhase::Finished
    }

    /// Display name of a team (falls back to the key).
    pub fn team_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.team_names.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn pool(&self, key: PoolKey) -> Result<&Pool, TournamentError> {
        self.pools.get(&key).ok_or(TournamentError::PoolNotFound(key))
    }

    /// Round currently being played in the knockout, if it has started.
    pub fn current_knockout_round(&self) -> Option<&KnockoutRound> {
        self.knockout_rounds.last()
    }
}
