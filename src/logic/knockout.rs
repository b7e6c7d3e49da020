//! Single-elimination bracket: seeding, results, and round advancement.
//!
//! Rounds move strictly forward (round16 -> quarter -> semi -> final -> done). A round is
//! complete once every match has a winner; the winner of the final is the champion.

use crate::models::{Match, MatchRound, MatchStatus, MatchWinner, RoundName, TeamKey, TournamentError};

/// Pair `qualified` sequentially: (0, 1), (2, 3), ... The round name follows the entrant
/// count (16 -> round16, 8 -> quarter, 4 -> semi, 2 -> final, otherwise round).
///
/// An odd entrant count leaves the last team without an opponent: that bye match is created
/// already played, with the lone team as winner.
pub fn seed_bracket(qualified: &[TeamKey]) -> Result<Vec<Match>, TournamentError> {
    if qualified.len() < 2 {
        return Err(TournamentError::InvalidBracket {
            teams: qualified.len(),
        });
    }
    Ok(seed_round(qualified, RoundName::for_team_count(qualified.len())))
}

/// Set the winner of a pending match. A bye has no opponent to beat, so any winner is invalid.
pub fn record_result(m: &Match, winner: &str) -> Result<Match, TournamentError> {
    if m.is_bye() {
        return Err(TournamentError::InvalidWinner(winner.to_string()));
    }
    if m.is_played() {
        return Err(TournamentError::MatchAlreadyPlayed(m.id.clone()));
    }
    if !m.involves(winner) {
        return Err(TournamentError::InvalidWinner(winner.to_string()));
    }
    let mut played = m.clone();
    played.status = MatchStatus::Played;
    played.winner = Some(MatchWinner::Team(winner.to_string()));
    Ok(played)
}

/// Winners of `current_round` in match order, re-paired into `next_round`.
///
/// Returns no matches when the round being advanced is the final (the bracket is done).
pub fn advance_round(
    current_round: &[Match],
    next_round: RoundName,
) -> Result<Vec<Match>, TournamentError> {
    if current_round.is_empty() {
        return Err(TournamentError::InvalidBracket { teams: 0 });
    }
    let winners = round_winners(current_round)?;
    if is_final(current_round) || winners.len() < 2 {
        log::debug!("bracket complete, champion {:?}", winners.first());
        return Ok(Vec::new());
    }
    Ok(seed_round(&winners, next_round))
}

/// Winners of every match in order; fails if any match is still undecided.
pub fn round_winners(round: &[Match]) -> Result<Vec<TeamKey>, TournamentError> {
    round
        .iter()
        .map(|m| m.winning_team().cloned().ok_or(TournamentError::RoundIncomplete))
        .collect()
}

/// Winner of a decided final.
pub fn champion(final_round: &[Match]) -> Option<TeamKey> {
    match final_round {
        [m] if m.round_name() == Some(RoundName::Final) => m.winning_team().cloned(),
        _ => None,
    }
}

fn is_final(round: &[Match]) -> bool {
    round.iter().all(|m| m.round_name() == Some(RoundName::Final))
}

fn seed_round(teams: &[TeamKey], name: RoundName) -> Vec<Match> {
    // Generic rounds can occur more than once, so their ids carry the entrant count.
    let slug = match name {
        RoundName::Round => format!("round{}", teams.len()),
        other => other.as_str().to_string(),
    };
    teams
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let number = i as u32 + 1;
            let mut m = Match::new(
                format!("knockout-{}-{}", slug, number),
                number,
                MatchRound::Knockout(name),
                pair[0].clone(),
                pair.get(1).cloned(),
            );
            if m.is_bye() {
                m.status = MatchStatus::Played;
                m.winner = Some(MatchWinner::Team(m.team_a.clone()));
            }
            m
        })
        .collect()
}
