//! Per-team standings record.

use serde::{Deserialize, Serialize};

/// Points for a win and a draw; a loss is worth nothing.
pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// Win/draw/loss record for one team. Always derived from played matches, never edited.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingsRecord {
    /// Fold one played match into the record from this team's point of view.
    pub fn add_result(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.wins += 1;
                self.points += POINTS_FOR_WIN;
            }
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => {
                self.draws += 1;
                self.points += POINTS_FOR_DRAW;
            }
        }
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }
}
