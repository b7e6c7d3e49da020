//! Standings: derive records from played matches and rank teams.

use crate::models::{Match, StandingsRecord, TeamKey};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Records for every key in `team_keys`, folded from the played, scored matches only.
///
/// Depends only on the matches passed in: calling it again on the same list gives the
/// same result, so callers recompute after every score instead of accumulating.
pub fn compute_standings(
    matches: &[Match],
    team_keys: &[TeamKey],
) -> HashMap<TeamKey, StandingsRecord> {
    let mut standings: HashMap<TeamKey, StandingsRecord> = team_keys
        .iter()
        .map(|k| (k.clone(), StandingsRecord::default()))
        .collect();

    for m in matches.iter().filter(|m| m.is_played()) {
        let (Some(team_b), Some(score_a), Some(score_b)) = (&m.team_b, m.score_a, m.score_b) else {
            continue;
        };
        if !standings.contains_key(&m.team_a) || !standings.contains_key(team_b) {
            log::warn!("skipping match {}: team outside standings scope", m.id);
            continue;
        }
        if let Some(record) = standings.get_mut(&m.team_a) {
            record.add_result(score_a, score_b);
        }
        if let Some(record) = standings.get_mut(team_b) {
            record.add_result(score_b, score_a);
        }
    }
    standings
}

/// Leaderboard order: points, then goal difference, then goals scored (all descending).
/// Teams still level keep their order in `team_keys`.
pub fn rank_teams(
    standings: &HashMap<TeamKey, StandingsRecord>,
    team_keys: &[TeamKey],
) -> Vec<TeamKey> {
    let mut ranked: Vec<&TeamKey> = team_keys.iter().collect();
    ranked.sort_by(|a, b| {
        let ra = standings.get(*a).copied().unwrap_or_default();
        let rb = standings.get(*b).copied().unwrap_or_default();
        compare_records(&ra, &rb)
    });
    ranked.into_iter().cloned().collect()
}

/// Ordering of two records in the leaderboard (`Less` ranks first).
pub fn compare_records(a: &StandingsRecord, b: &StandingsRecord) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}
