//! Data structures: players, teams, matches, standings, tournaments, sessions.

mod game;
mod player;
mod session;
mod standings;
mod team;
mod tournament;

pub use game::{Match, MatchId, MatchRound, MatchStatus, MatchWinner, RoundName};
pub use player::{Player, PlayerId, Position, DEFAULT_LEVEL, MAX_LEVEL, MIN_LEVEL};
pub use session::{PartitionPolicy, Session, SessionId};
pub use standings::{StandingsRecord, POINTS_FOR_DRAW, POINTS_FOR_WIN};
pub use team::{team_key, team_keys, TeamAssignment, TeamKey, TeamRoster, TeamStats};
pub use tournament::{
    pool_sizes, KnockoutRound, Pool, PoolKey, Tournament, TournamentConfig, TournamentError,
    TournamentFormat, TournamentId, TournamentPhase, MAX_QUALIFIED_PER_POOL, MAX_TEAMS, MIN_TEAMS,
};
