//! Team shuffle organizer: library with models and business logic.
//!
//! Splits rated players into balanced teams and runs league or pools + knockout
//! tournaments. Every operation is a pure transformation; persistence is the caller's job.

pub mod logic;
pub mod models;

pub use logic::{
    advance_knockout, advance_round, allocate_pools, build_pools, champion, compare_records,
    compute_standings, create_session, create_tournament, finish_league, generate_pool_matches,
    generate_round_robin, leaderboard, parse_roster_csv, partition, pool_leaderboard,
    qualified_teams, rank_teams, record_knockout_winner, record_league_score, record_pool_score,
    record_result, record_score, regenerate, rename_team, reshuffle, round_winners, seed_bracket,
    start_knockout,
};
pub use models::{
    team_key, team_keys, KnockoutRound, Match, MatchId, MatchRound, MatchStatus, MatchWinner,
    PartitionPolicy, Player, PlayerId, Pool, PoolKey, Position, RoundName, Session, SessionId,
    StandingsRecord, TeamAssignment, TeamKey, TeamRoster, TeamStats, Tournament, TournamentConfig,
    TournamentError, TournamentFormat, TournamentId, TournamentPhase,
};
