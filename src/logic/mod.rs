//! Business logic: team partitioning, schedules, standings, pools, knockout, lifecycle.

mod competition;
mod knockout;
mod partition;
mod pools;
mod roster;
mod schedule;
mod session;
mod standings;

pub use competition::{
    advance_knockout, create_tournament, finish_league, leaderboard, pool_leaderboard,
    record_knockout_winner, record_league_score, record_pool_score, record_score, rename_team,
    start_knockout,
};
pub use knockout::{advance_round, champion, record_result, round_winners, seed_bracket};
pub use partition::partition;
pub use pools::{allocate_pools, qualified_teams};
pub use roster::parse_roster_csv;
pub use schedule::{build_pools, generate_pool_matches, generate_round_robin};
pub use session::{create_session, regenerate, reshuffle};
pub use standings::{compare_records, compute_standings, rank_teams};
