//! Round-robin schedules (circle method), for a league or for each pool.

use crate::models::{Match, MatchRound, Pool, PoolKey, TeamKey, TournamentError};
use std::collections::BTreeMap;

/// Single round-robin over `team_keys`, grouped into matchdays where no team plays twice.
///
/// With an odd team count a bye slot is added; the team drawn against it sits out that
/// matchday and no match is created. Match ids are `match-1`, `match-2`, ...
pub fn generate_round_robin(team_keys: &[TeamKey]) -> Result<Vec<Match>, TournamentError> {
    round_robin("match", team_keys)
}

/// One independent round-robin per pool. Ids are prefixed with the pool key
/// (`poolA-match-1`) so they stay unique across the tournament.
pub fn generate_pool_matches(
    pools: &BTreeMap<PoolKey, Vec<TeamKey>>,
) -> Result<BTreeMap<PoolKey, Vec<Match>>, TournamentError> {
    pools
        .iter()
        .map(|(key, teams)| Ok((*key, round_robin(&format!("{}-match", key), teams)?)))
        .collect()
}

/// Fresh pools with their schedules and zeroed standings.
pub fn build_pools(
    pools: &BTreeMap<PoolKey, Vec<TeamKey>>,
) -> Result<BTreeMap<PoolKey, Pool>, TournamentError> {
    let mut schedules = generate_pool_matches(pools)?;
    Ok(pools
        .iter()
        .map(|(key, teams)| {
            let matches = schedules.remove(key).unwrap_or_default();
            let standings = crate::logic::compute_standings(&matches, teams);
            (
                *key,
                Pool {
                    teams: teams.clone(),
                    matches,
                    standings,
                },
            )
        })
        .collect())
}

fn round_robin(id_prefix: &str, team_keys: &[TeamKey]) -> Result<Vec<Match>, TournamentError> {
    if team_keys.len() < 2 {
        return Err(TournamentError::InvalidSchedule {
            teams: team_keys.len(),
        });
    }

    let mut slots: Vec<Option<&TeamKey>> = team_keys.iter().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let total = slots.len();
    let rounds = total - 1;
    let per_round = total / 2;
    // The last slot stays fixed; the others rotate one step per round.
    let fixed = total - 1;

    let mut matches = Vec::with_capacity(team_keys.len() * (team_keys.len() - 1) / 2);
    for round in 0..rounds {
        for pairing in 0..per_round {
            let (home, away) = if pairing == 0 {
                (fixed, round)
            } else {
                ((round + pairing) % rounds, (round + rounds - pairing) % rounds)
            };
            if let (Some(team_a), Some(team_b)) = (slots[home], slots[away]) {
                let number = matches.len() as u32 + 1;
                matches.push(Match::new(
                    format!("{}-{}", id_prefix, number),
                    number,
                    MatchRound::Matchday(round as u32 + 1),
                    team_a.clone(),
                    Some(team_b.clone()),
                ));
            }
        }
    }
    log::debug!(
        "generated {} matches over {} matchdays for {} teams",
        matches.len(),
        rounds,
        team_keys.len()
    );
    Ok(matches)
}
