//! Match, MatchWinner, and knockout RoundName.

use crate::models::team::TeamKey;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match within a tournament (e.g. `match-3`, `poolA-match-1`).
pub type MatchId = String;

/// Whether a match has a result yet.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Played,
}

/// Outcome of a played match. Serialized as the winning team key, or `"draw"`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchWinner {
    Team(TeamKey),
    Draw,
}

const DRAW: &str = "draw";

impl From<String> for MatchWinner {
    fn from(value: String) -> Self {
        if value == DRAW {
            MatchWinner::Draw
        } else {
            MatchWinner::Team(value)
        }
    }
}

impl From<MatchWinner> for String {
    fn from(winner: MatchWinner) -> Self {
        match winner {
            MatchWinner::Team(key) => key,
            MatchWinner::Draw => DRAW.to_string(),
        }
    }
}

/// Knockout stage of a match. `Round` is the generic label for brackets that are
/// not a power of two.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundName {
    #[serde(rename = "round16")]
    Round16,
    Quarter,
    Semi,
    Final,
    Round,
}

impl RoundName {
    /// Name of a round entered by `teams` teams.
    pub fn for_team_count(teams: usize) -> Self {
        match teams {
            16 => RoundName::Round16,
            8 => RoundName::Quarter,
            4 => RoundName::Semi,
            2 => RoundName::Final,
            _ => RoundName::Round,
        }
    }

    /// Round after this one, given how many winners it produced. `None` after the final.
    pub fn following(self, winners: usize) -> Option<Self> {
        match self {
            RoundName::Round16 => Some(RoundName::Quarter),
            RoundName::Quarter => Some(RoundName::Semi),
            RoundName::Semi => Some(RoundName::Final),
            RoundName::Final => None,
            RoundName::Round if winners < 2 => None,
            RoundName::Round => Some(RoundName::for_team_count(winners)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundName::Round16 => "round16",
            RoundName::Quarter => "quarter",
            RoundName::Semi => "semi",
            RoundName::Final => "final",
            RoundName::Round => "round",
        }
    }
}

impl std::fmt::Display for RoundName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a match sits in the competition: a league/pool matchday or a knockout round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRound {
    /// 1-based matchday of a round-robin.
    Matchday(u32),
    Knockout(RoundName),
}

/// A single match between two teams. `team_b == None` is a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based position within its schedule or round.
    pub number: u32,
    pub round: MatchRound,
    pub team_a: TeamKey,
    pub team_b: Option<TeamKey>,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    pub status: MatchStatus,
    /// None until played.
    pub winner: Option<MatchWinner>,
}

impl Match {
    pub fn new(
        id: impl Into<MatchId>,
        number: u32,
        round: MatchRound,
        team_a: TeamKey,
        team_b: Option<TeamKey>,
    ) -> Self {
        Self {
            id: id.into(),
            number,
            round,
            team_a,
            team_b,
            score_a: None,
            score_b: None,
            status: MatchStatus::Pending,
            winner: None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.status == MatchStatus::Played
    }

    pub fn is_bye(&self) -> bool {
        self.team_b.is_none()
    }

    /// True if `team` is one of the two participants.
    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b.as_deref() == Some(team)
    }

    /// Winning team key, if the match was won outright.
    pub fn winning_team(&self) -> Option<&TeamKey> {
        match &self.winner {
            Some(MatchWinner::Team(key)) => Some(key),
            _ => None,
        }
    }

    /// Knockout round of this match, if any.
    pub fn round_name(&self) -> Option<RoundName> {
        match self.round {
            MatchRound::Knockout(name) => Some(name),
            MatchRound::Matchday(_) => None,
        }
    }
}
