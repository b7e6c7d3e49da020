//! Integration tests for whole tournaments: league and pools + knockout.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use team_shuffle_web::{
    advance_knockout, advance_round, create_tournament, generate_round_robin, leaderboard,
    record_knockout_winner, record_league_score, record_pool_score, record_result, seed_bracket,
    start_knockout, team_keys, MatchRound, PoolKey, RoundName, Tournament, TournamentConfig,
    TournamentError, TournamentPhase,
};

fn play_all_pools(mut t: Tournament) -> Tournament {
    let pending: Vec<(PoolKey, String, String, String)> = t
        .pools
        .iter()
        .flat_map(|(key, pool)| {
            pool.matches
                .iter()
                .map(move |m| (*key, m.id.clone(), m.team_a.clone(), m.team_b.clone().unwrap()))
        })
        .collect();
    for (pool, id, team_a, team_b) in pending {
        // Lower team number always wins, so the ranking is predictable.
        let (a, b) = if team_number(&team_a) < team_number(&team_b) { (2, 0) } else { (0, 2) };
        t = record_pool_score(&t, pool, &id, a, b).unwrap();
    }
    t
}

fn team_number(key: &str) -> u32 {
    key.trim_start_matches("team").parse().unwrap()
}

fn decide_current_round(mut t: Tournament) -> Tournament {
    let pending: Vec<(String, String)> = t
        .current_knockout_round()
        .unwrap()
        .matches
        .iter()
        .filter(|m| !m.is_played())
        .map(|m| {
            let a = m.team_a.clone();
            let b = m.team_b.clone().unwrap();
            let winner = if team_number(&a) < team_number(&b) { a } else { b };
            (m.id.clone(), winner)
        })
        .collect();
    for (id, winner) in pending {
        t = record_knockout_winner(&t, &id, &winner).unwrap();
    }
    t
}

#[test]
fn odd_round_robin_has_a_bye_every_matchday() {
    let matches = generate_round_robin(&team_keys(3)).unwrap();
    assert_eq!(matches.len(), 3);
    let matchdays: HashSet<MatchRound> = matches.iter().map(|m| m.round).collect();
    assert_eq!(matchdays.len(), 3);
    for round in matchdays {
        assert_eq!(matches.iter().filter(|m| m.round == round).count(), 1);
    }
}

#[test]
fn four_team_bracket_reaches_a_final() {
    let semis = seed_bracket(&team_keys(4)).unwrap();
    assert_eq!(semis.len(), 2);
    assert!(semis.iter().all(|m| m.round == MatchRound::Knockout(RoundName::Semi)));
    assert_eq!(
        advance_round(&semis, RoundName::Final),
        Err(TournamentError::RoundIncomplete)
    );

    let decided = vec![
        record_result(&semis[0], "team1").unwrap(),
        record_result(&semis[1], "team4").unwrap(),
    ];
    let finals = advance_round(&decided, RoundName::Final).unwrap();
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].team_a, "team1");
    assert_eq!(finals[0].team_b.as_deref(), Some("team4"));
}

#[test]
fn pools_to_champion() {
    let mut rng = StdRng::seed_from_u64(21);
    let config = TournamentConfig::pools("Summer Cup", 8, 2, 2);
    let t = create_tournament(&config, &mut rng).unwrap();
    assert_eq!(t.pools.len(), 2);
    assert!(t.pools.values().all(|p| p.teams.len() == 4 && p.matches.len() == 6));

    let t = play_all_pools(t);
    let t = start_knockout(&t).unwrap();
    assert_eq!(t.phase, TournamentPhase::Knockout);
    let semis = t.current_knockout_round().unwrap();
    assert_eq!(semis.name, RoundName::Semi);
    assert_eq!(semis.matches.len(), 2);
    // the strongest team of each pool qualified first
    for pool in t.pools.values() {
        let best = pool.teams.iter().min_by_key(|k| team_number(k)).unwrap();
        assert!(semis.matches.iter().any(|m| m.involves(best)));
    }

    assert_eq!(advance_knockout(&t), Err(TournamentError::RoundIncomplete));
    let t = advance_knockout(&decide_current_round(t)).unwrap();
    assert_eq!(t.current_knockout_round().unwrap().name, RoundName::Final);
    assert_eq!(t.current_knockout_round().unwrap().matches.len(), 1);

    let t = advance_knockout(&decide_current_round(t)).unwrap();
    assert_eq!(t.phase, TournamentPhase::Finished);
    assert_eq!(t.champion.as_deref(), Some("team1"));
    assert!(t.finished_at.is_some());
    assert_eq!(advance_knockout(&t), Err(TournamentError::ReadOnly));
}

#[test]
fn odd_qualifier_count_uses_a_bye() {
    let mut rng = StdRng::seed_from_u64(3);
    // 2 pools of 3, top 3 each -> 6 qualifiers: generic round of 3 matches
    let t = create_tournament(&TournamentConfig::pools("Odd", 6, 2, 3), &mut rng).unwrap();
    let t = start_knockout(&play_all_pools(t)).unwrap();
    let first = t.current_knockout_round().unwrap();
    assert_eq!(first.name, RoundName::Round);
    assert_eq!(first.matches.len(), 3);

    // 3 winners -> another generic round with a bye for the last one
    let t = advance_knockout(&decide_current_round(t)).unwrap();
    let second = t.current_knockout_round().unwrap();
    assert_eq!(second.name, RoundName::Round);
    assert_eq!(second.matches.len(), 2);
    assert!(second.matches[1].is_bye() && second.matches[1].is_played());

    let t = advance_knockout(&decide_current_round(t)).unwrap();
    assert_eq!(t.current_knockout_round().unwrap().name, RoundName::Final);
    let t = advance_knockout(&decide_current_round(t)).unwrap();
    assert_eq!(t.phase, TournamentPhase::Finished);
    assert!(t.champion.is_some());

    let ids: HashSet<&str> = t
        .knockout_rounds
        .iter()
        .flat_map(|r| r.matches.iter().map(|m| m.id.as_str()))
        .collect();
    assert_eq!(ids.len(), 3 + 2 + 1);
}

#[test]
fn league_standings_follow_scores() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut t = create_tournament(&TournamentConfig::league("League", 4), &mut rng).unwrap();
    let ids: Vec<(String, String, String)> = t
        .matches
        .iter()
        .map(|m| (m.id.clone(), m.team_a.clone(), m.team_b.clone().unwrap()))
        .collect();
    for (id, a, b) in ids {
        let (sa, sb) = if team_number(&a) < team_number(&b) { (1, 0) } else { (0, 1) };
        t = record_league_score(&t, &id, sa, sb).unwrap();
    }
    let table = leaderboard(&t).unwrap();
    let order: Vec<&str> = table.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(order, vec!["team1", "team2", "team3", "team4"]);
    assert_eq!(table[0].1.points, 9);
    for (_, record) in &table {
        assert_eq!(record.wins + record.draws + record.losses, record.played);
        assert_eq!(record.points, 3 * record.wins + record.draws);
    }
}

#[test]
fn tournament_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(8);
    let t = create_tournament(&TournamentConfig::pools("Json", 8, 4, 1), &mut rng).unwrap();
    let t = start_knockout(&play_all_pools(t)).unwrap();
    let json = serde_json::to_string(&t).unwrap();
    let back: Tournament = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}

#[test]
fn pool_score_on_wrong_phase_is_rejected() {
    let mut rng = StdRng::seed_from_u64(1);
    let t = create_tournament(&TournamentConfig::league("L", 4), &mut rng).unwrap();
    assert_eq!(
        record_pool_score(&t, PoolKey::PoolA, "poolA-match-1", 1, 0),
        Err(TournamentError::InvalidState)
    );
}
