//! Quick-match sessions: partition a roster once, reshuffle on demand.

use crate::logic::partition::partition;
use crate::models::{PartitionPolicy, Player, Session, TournamentError};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// Split `players` into teams and record per-team level averages.
pub fn create_session<R: Rng + ?Sized>(
    players: Vec<Player>,
    policy: PartitionPolicy,
    team_count: usize,
    rng: &mut R,
) -> Result<Session, TournamentError> {
    let teams = partition(&players, policy, team_count, rng)?;
    let stats = teams.stats();
    Ok(Session {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        policy,
        team_count,
        players,
        teams,
        stats,
    })
}

/// New line-up from the same roster and policy. The previous teams are discarded.
pub fn reshuffle<R: Rng + ?Sized>(session: &Session, rng: &mut R) -> Result<Session, TournamentError> {
    create_session(session.players.clone(), session.policy, session.team_count, rng)
}

/// Same roster with a different policy or team count.
pub fn regenerate<R: Rng + ?Sized>(
    session: &Session,
    policy: PartitionPolicy,
    team_count: usize,
    rng: &mut R,
) -> Result<Session, TournamentError> {
    create_session(session.players.clone(), policy, team_count, rng)
}
