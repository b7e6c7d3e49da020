//! Tournament lifecycle: creation, score entry, knockout progression, and finishing.
//!
//! Every operation takes the current tournament by reference and returns the next one.
//! On error the input is untouched, so callers can read, apply, and write back.

use crate::logic::knockout::{advance_round, record_result, round_winners, seed_bracket};
use crate::logic::pools::{allocate_pools, qualified_teams};
use crate::logic::schedule::{build_pools, generate_round_robin};
use crate::logic::standings::{compute_standings, rank_teams};
use crate::models::{
    team_keys, KnockoutRound, Match, MatchId, MatchStatus, MatchWinner, PoolKey, RoundName,
    StandingsRecord, TeamKey, Tournament, TournamentConfig, TournamentError, TournamentFormat,
    TournamentPhase,
};
use chrono::Utc;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Validate `config` and generate the league schedule, or the pools and their schedules.
pub fn create_tournament<R: Rng + ?Sized>(
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    config.validate()?;

    let keys = team_keys(config.team_count);
    let team_names: HashMap<TeamKey, String> = keys
        .iter()
        .map(|k| {
            let name = config
                .team_names
                .get(k)
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| k.clone());
            (k.clone(), name)
        })
        .collect();

    let mut tournament = Tournament {
        id: Uuid::new_v4(),
        name: config.name.trim().to_string(),
        format: config.format,
        phase: TournamentPhase::League,
        created_at: Utc::now(),
        finished_at: None,
        team_keys: keys.clone(),
        team_names,
        matches: Vec::new(),
        standings: HashMap::new(),
        pool_count: None,
        qualified_per_pool: None,
        pools: BTreeMap::new(),
        knockout_rounds: Vec::new(),
        champion: None,
    };

    match config.format {
        TournamentFormat::League => {
            tournament.matches = generate_round_robin(&keys)?;
            tournament.standings = compute_standings(&tournament.matches, &keys);
        }
        TournamentFormat::Pools => {
            let pool_count = config.pool_count.unwrap_or_default();
            let allocation = allocate_pools(&keys, pool_count, rng)?;
            tournament.pools = build_pools(&allocation)?;
            tournament.pool_count = Some(pool_count);
            tournament.qualified_per_pool = config.qualified_per_pool;
            tournament.phase = TournamentPhase::Pools;
        }
    }
    log::debug!(
        "created {:?} tournament {} with {} teams",
        tournament.format,
        tournament.id,
        config.team_count
    );
    Ok(tournament)
}

/// Change a team's display name.
pub fn rename_team(
    tournament: &Tournament,
    team: &str,
    name: &str,
) -> Result<Tournament, TournamentError> {
    ensure_writable(tournament)?;
    if !tournament.team_keys.iter().any(|k| k == team) {
        return Err(TournamentError::TeamNotFound(team.to_string()));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::InvalidConfig("team name cannot be empty".into()));
    }
    let mut next = tournament.clone();
    next.team_names.insert(team.to_string(), name.to_string());
    Ok(next)
}

/// Score a pending round-robin match. The winner is the higher score, or a draw.
pub fn record_score(m: &Match, score_a: u32, score_b: u32) -> Result<Match, TournamentError> {
    if m.is_played() {
        return Err(TournamentError::MatchAlreadyPlayed(m.id.clone()));
    }
    let Some(team_b) = &m.team_b else {
        return Err(TournamentError::InvalidState);
    };
    let mut played = m.clone();
    played.score_a = Some(score_a);
    played.score_b = Some(score_b);
    played.status = MatchStatus::Played;
    played.winner = Some(match score_a.cmp(&score_b) {
        std::cmp::Ordering::Greater => MatchWinner::Team(m.team_a.clone()),
        std::cmp::Ordering::Less => MatchWinner::Team(team_b.clone()),
        std::cmp::Ordering::Equal => MatchWinner::Draw,
    });
    Ok(played)
}

/// Score a league match and recompute the league standings.
pub fn record_league_score(
    tournament: &Tournament,
    match_id: &str,
    score_a: u32,
    score_b: u32,
) -> Result<Tournament, TournamentError> {
    ensure_phase(tournament, TournamentPhase::League)?;
    let idx = find_match(&tournament.matches, match_id)?;
    let played = record_score(&tournament.matches[idx], score_a, score_b)?;

    let mut next = tournament.clone();
    next.matches[idx] = played;
    next.standings = compute_standings(&next.matches, &next.team_keys);
    Ok(next)
}

/// Score a pool match and recompute that pool's standings.
pub fn record_pool_score(
    tournament: &Tournament,
    pool: PoolKey,
    match_id: &str,
    score_a: u32,
    score_b: u32,
) -> Result<Tournament, TournamentError> {
    ensure_phase(tournament, TournamentPhase::Pools)?;
    let current = tournament.pool(pool)?;
    let idx = find_match(&current.matches, match_id)?;
    let played = record_score(&current.matches[idx], score_a, score_b)?;

    let mut next = tournament.clone();
    if let Some(p) = next.pools.get_mut(&pool) {
        p.matches[idx] = played;
        p.standings = compute_standings(&p.matches, &p.teams);
    }
    Ok(next)
}

/// Close the pools and seed the bracket from each pool's top teams.
/// Every pool match must have been played.
pub fn start_knockout(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    ensure_phase(tournament, TournamentPhase::Pools)?;
    let all_played = tournament
        .pools
        .values()
        .flat_map(|p| p.matches.iter())
        .all(Match::is_played);
    if !all_played {
        return Err(TournamentError::RoundIncomplete);
    }

    let qualified = qualified_teams(
        &tournament.pools,
        tournament.qualified_per_pool.unwrap_or(1),
    );
    let matches = seed_bracket(&qualified)?;
    let name = RoundName::for_team_count(qualified.len());

    let mut next = tournament.clone();
    next.knockout_rounds = vec![KnockoutRound { name, matches }];
    next.phase = TournamentPhase::Knockout;
    log::debug!(
        "tournament {} enters knockout at {} with {} teams",
        next.id,
        name,
        qualified.len()
    );
    Ok(next)
}

/// Record the winner of a match in the current knockout round.
pub fn record_knockout_winner(
    tournament: &Tournament,
    match_id: &str,
    winner: &str,
) -> Result<Tournament, TournamentError> {
    ensure_phase(tournament, TournamentPhase::Knockout)?;
    let round = tournament
        .current_knockout_round()
        .ok_or(TournamentError::InvalidState)?;
    let idx = find_match(&round.matches, match_id)?;
    let played = record_result(&round.matches[idx], winner)?;

    let mut next = tournament.clone();
    if let Some(r) = next.knockout_rounds.last_mut() {
        r.matches[idx] = played;
    }
    Ok(next)
}

/// Move the bracket forward once every current match has a winner. After the final
/// (or when a single team remains) the tournament finishes with its champion.
pub fn advance_knockout(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    ensure_phase(tournament, TournamentPhase::Knockout)?;
    let current = tournament
        .current_knockout_round()
        .ok_or(TournamentError::InvalidState)?;
    let winners = round_winners(&current.matches)?;

    let mut next = tournament.clone();
    match current.name.following(winners.len()) {
        Some(name) => {
            let matches = advance_round(&current.matches, name)?;
            next.knockout_rounds.push(KnockoutRound { name, matches });
            log::debug!("tournament {} advances to {}", next.id, name);
        }
        None => {
            next.champion = winners.into_iter().next();
            next.phase = TournamentPhase::Finished;
            next.finished_at = Some(Utc::now());
            log::debug!("tournament {} finished, champion {:?}", next.id, next.champion);
        }
    }
    Ok(next)
}

/// End a league. The top of the table becomes champion.
pub fn finish_league(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    ensure_phase(tournament, TournamentPhase::League)?;
    let mut next = tournament.clone();
    next.champion = rank_teams(&next.standings, &next.team_keys).into_iter().next();
    next.phase = TournamentPhase::Finished;
    next.finished_at = Some(Utc::now());
    Ok(next)
}

/// League table in leaderboard order.
pub fn leaderboard(tournament: &Tournament) -> Result<Vec<(TeamKey, StandingsRecord)>, TournamentError> {
    if tournament.format != TournamentFormat::League {
        return Err(TournamentError::InvalidState);
    }
    Ok(ranked(&tournament.standings, &tournament.team_keys))
}

/// One pool's table in leaderboard order.
pub fn pool_leaderboard(
    tournament: &Tournament,
    pool: PoolKey,
) -> Result<Vec<(TeamKey, StandingsRecord)>, TournamentError> {
    let p = tournament.pool(pool)?;
    Ok(ranked(&p.standings, &p.teams))
}

fn ranked(
    standings: &HashMap<TeamKey, StandingsRecord>,
    keys: &[TeamKey],
) -> Vec<(TeamKey, StandingsRecord)> {
    rank_teams(standings, keys)
        .into_iter()
        .map(|k| {
            let record = standings.get(&k).copied().unwrap_or_default();
            (k, record)
        })
        .collect()
}

fn ensure_writable(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.is_finished() {
        return Err(TournamentError::ReadOnly);
    }
    Ok(())
}

fn ensure_phase(tournament: &Tournament, phase: TournamentPhase) -> Result<(), TournamentError> {
    ensure_writable(tournament)?;
    if tournament.phase != phase {
        return Err(TournamentError::InvalidState);
    }
    Ok(())
}

fn find_match(matches: &[Match], match_id: &str) -> Result<usize, TournamentError> {
    matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(MatchId::from(match_id)))
}
