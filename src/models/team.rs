//! Team keys and team assignments produced by the partitioner.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};

/// Opaque team identifier (`team1`, `team2`, ...). Display names live with the caller.
pub type TeamKey = String;

/// Key for the team at zero-based `index`.
pub fn team_key(index: usize) -> TeamKey {
    format!("team{}", index + 1)
}

/// Keys `team1..=teamN`.
pub fn team_keys(count: usize) -> Vec<TeamKey> {
    (0..count).map(team_key).collect()
}

/// One team of a partition, in the order players were placed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub key: TeamKey,
    pub players: Vec<Player>,
}

impl TeamRoster {
    pub fn new(key: TeamKey) -> Self {
        Self {
            key,
            players: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Sum of effective levels.
    pub fn level_sum(&self) -> u32 {
        self.players.iter().map(Player::effective_level).sum()
    }

    /// Average level rounded to one decimal (0.0 for an empty team).
    pub fn average_level(&self) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        round_one_decimal(f64::from(self.level_sum()) / self.players.len() as f64)
    }
}

/// Result of one partition call: every input player in exactly one team.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub teams: Vec<TeamRoster>,
}

/// Average level per team and the spread between strongest and weakest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub average_levels: Vec<(TeamKey, f64)>,
    pub difference: f64,
}

impl TeamAssignment {
    /// Empty teams `team1..=teamN`.
    pub fn with_team_count(count: usize) -> Self {
        Self {
            teams: team_keys(count).into_iter().map(TeamRoster::new).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TeamRoster> {
        self.teams.iter().find(|t| t.key == key)
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.teams.iter().map(TeamRoster::len).collect()
    }

    /// Number of players across all teams.
    pub fn player_count(&self) -> usize {
        self.teams.iter().map(TeamRoster::len).sum()
    }

    pub fn stats(&self) -> TeamStats {
        let average_levels: Vec<(TeamKey, f64)> = self
            .teams
            .iter()
            .map(|t| (t.key.clone(), t.average_level()))
            .collect();
        let max = average_levels
            .iter()
            .map(|(_, a)| *a)
            .fold(f64::NEG_INFINITY, f64::max);
        let min = average_levels
            .iter()
            .map(|(_, a)| *a)
            .fold(f64::INFINITY, f64::min);
        let difference = if average_levels.is_empty() {
            0.0
        } else {
            round_one_decimal(max - min)
        };
        TeamStats {
            average_levels,
            difference,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_start_at_one() {
        assert_eq!(team_keys(3), vec!["team1", "team2", "team3"]);
    }

    #[test]
    fn stats_round_to_one_decimal() {
        let mut assignment = TeamAssignment::with_team_count(2);
        assignment.teams[0].players = vec![
            Player::new("a").with_level(5),
            Player::new("b").with_level(4),
            Player::new("c").with_level(4),
        ];
        assignment.teams[1].players = vec![Player::new("d").with_level(2), Player::new("e")];
        let stats = assignment.stats();
        assert_eq!(stats.average_levels[0], ("team1".to_string(), 4.3));
        assert_eq!(stats.average_levels[1], ("team2".to_string(), 2.5));
        assert_eq!(stats.difference, 1.8);
    }
}
