//! Single binary web server: JSON API over the team shuffle library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{self, Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use team_shuffle_web::{
    advance_knockout, create_session, create_tournament, finish_league, leaderboard,
    parse_roster_csv, pool_leaderboard, record_knockout_winner, record_league_score,
    record_pool_score, regenerate, rename_team, reshuffle, start_knockout, PartitionPolicy,
    Player, PoolKey, Session, SessionId, TeamKey, Tournament, TournamentConfig, TournamentError,
    TournamentFormat, TournamentId, TournamentPhase,
};
use chrono::{DateTime, Utc};

/// Stored value + last activity time (for auto-cleanup).
struct Entry<T> {
    value: T,
    last_activity: Instant,
}

impl<T> Entry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            last_activity: Instant::now(),
        }
    }
}

/// In-memory state: tournaments and quick-match sessions by ID.
#[derive(Default)]
struct Store {
    tournaments: HashMap<TournamentId, Entry<Tournament>>,
    sessions: HashMap<SessionId, Entry<Session>>,
}

type AppState = Data<RwLock<Store>>;

/// Inactivity threshold: entries not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// One row of the competition history.
#[derive(Serialize, Deserialize)]
struct TournamentSummary {
    id: TournamentId,
    name: String,
    format: TournamentFormat,
    phase: TournamentPhase,
    created_at: DateTime<Utc>,
    team_count: usize,
    champion: Option<TeamKey>,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            format: t.format,
            phase: t.phase,
            created_at: t.created_at,
            team_count: t.team_keys.len(),
            champion: t.champion.clone(),
        }
    }
}

#[derive(Serialize)]
struct ClearedResponse {
    removed: usize,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    players: Vec<Player>,
    #[serde(default)]
    policy: PartitionPolicy,
    #[serde(default = "default_team_count")]
    team_count: usize,
}

fn default_team_count() -> usize {
    2
}

#[derive(Deserialize)]
struct RegenerateSessionBody {
    policy: PartitionPolicy,
    #[serde(default = "default_team_count")]
    team_count: usize,
}

#[derive(Deserialize)]
struct TeamNameBody {
    name: String,
}

#[derive(Deserialize)]
struct ScoreBody {
    score_a: u32,
    score_b: u32,
}

#[derive(Deserialize)]
struct WinnerBody {
    winner: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team: String,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: String,
}

#[derive(Deserialize)]
struct PoolPath {
    id: TournamentId,
    pool: String,
}

#[derive(Deserialize)]
struct PoolMatchPath {
    id: TournamentId,
    pool: String,
    match_id: String,
}

fn bad_request(e: TournamentError) -> HttpResponse {
    log::debug!("rejected request: {}", e);
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No {}", what) }))
}

fn lock_error() -> HttpResponse {
    log::error!("store lock poisoned");
    HttpResponse::InternalServerError().body("lock error")
}

fn parse_pool(pool: &str) -> Result<PoolKey, HttpResponse> {
    PoolKey::parse(pool).ok_or_else(|| not_found("pool"))
}

/// Read-modify-write one tournament: run `op` on the stored value and replace it on success.
fn update_tournament<F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> Result<Tournament, TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.tournaments.get_mut(&id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    match op(&entry.value) {
        Ok(next) => {
            entry.value = next;
            HttpResponse::Ok().json(&entry.value)
        }
        Err(e) => bad_request(e),
    }
}

/// Read-only view of one tournament.
fn view_tournament<F, T>(state: &AppState, id: TournamentId, view: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> Result<T, TournamentError>,
    T: Serialize,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournaments.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            match view(&entry.value) {
                Ok(body) => HttpResponse::Ok().json(body),
                Err(e) => bad_request(e),
            }
        }
        None => not_found("tournament"),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-shuffle-web",
    })
}

/// Parse a CSV roster (text body) into players; nothing is stored.
#[post("/api/roster/import")]
async fn api_import_roster(body: Bytes) -> HttpResponse {
    match parse_roster_csv(body.as_ref()) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => bad_request(e),
    }
}

/// Split a roster into teams and keep the session.
#[post("/api/sessions")]
async fn api_create_session(state: AppState, body: Json<CreateSessionBody>) -> HttpResponse {
    let body = body.into_inner();
    let session = match create_session(body.players, body.policy, body.team_count, &mut rand::thread_rng()) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&session);
    g.sessions.insert(session.id, Entry::new(session));
    response
}

#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.sessions.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.value)
        }
        None => not_found("session"),
    }
}

/// Saved sessions, newest first. Listing does not count as activity.
#[get("/api/sessions")]
async fn api_list_sessions(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut sessions: Vec<&Session> = g.sessions.values().map(|e| &e.value).collect();
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    HttpResponse::Ok().json(sessions)
}

#[delete("/api/sessions/{id}")]
async fn api_delete_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.sessions.remove(&path.id) {
        Some(_) => {
            log::info!("Deleted session {}", path.id);
            HttpResponse::NoContent().finish()
        }
        None => not_found("session"),
    }
}

/// Drop the whole session history.
#[delete("/api/sessions")]
async fn api_clear_sessions(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let removed = g.sessions.len();
    g.sessions.clear();
    log::info!("Cleared {} sessions", removed);
    HttpResponse::Ok().json(ClearedResponse { removed })
}

/// Reshuffle the same roster. Stored under the new session id; the old one is dropped.
#[post("/api/sessions/{id}/reshuffle")]
async fn api_reshuffle_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    replace_session(&state, path.id, |s| reshuffle(s, &mut rand::thread_rng()))
}

/// Regenerate with another policy or team count.
#[post("/api/sessions/{id}/regenerate")]
async fn api_regenerate_session(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<RegenerateSessionBody>,
) -> HttpResponse {
    replace_session(&state, path.id, |s| {
        regenerate(s, body.policy, body.team_count, &mut rand::thread_rng())
    })
}

fn replace_session<F>(state: &AppState, id: SessionId, op: F) -> HttpResponse
where
    F: FnOnce(&Session) -> Result<Session, TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let next = match g.sessions.get(&id) {
        Some(entry) => match op(&entry.value) {
            Ok(next) => next,
            Err(e) => return bad_request(e),
        },
        None => return not_found("session"),
    };
    g.sessions.remove(&id);
    let response = HttpResponse::Ok().json(&next);
    g.sessions.insert(next.id, Entry::new(next));
    response
}

/// Create a tournament from its configuration (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentConfig>) -> HttpResponse {
    let tournament = match create_tournament(&body, &mut rand::thread_rng()) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    log::info!("Created tournament {} ({:?})", tournament.id, tournament.format);
    let response = HttpResponse::Ok().json(&tournament);
    g.tournaments.insert(tournament.id, Entry::new(tournament));
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, path.id, |t| Ok(t.clone()))
}

/// Competition history, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut summaries: Vec<TournamentSummary> =
        g.tournaments.values().map(|e| TournamentSummary::from(&e.value)).collect();
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    HttpResponse::Ok().json(summaries)
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.tournaments.remove(&path.id) {
        Some(_) => {
            log::info!("Deleted tournament {}", path.id);
            HttpResponse::NoContent().finish()
        }
        None => not_found("tournament"),
    }
}

#[put("/api/tournaments/{id}/teams/{team}/name")]
async fn api_rename_team(state: AppState, path: Path<TeamPath>, body: Json<TeamNameBody>) -> HttpResponse {
    update_tournament(&state, path.id, |t| rename_team(t, &path.team, &body.name))
}

/// Enter the score of a league match.
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_league_score(state: AppState, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        record_league_score(t, &path.match_id, body.score_a, body.score_b)
    })
}

#[get("/api/tournaments/{id}/leaderboard")]
async fn api_leaderboard(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view_tournament(&state, path.id, leaderboard)
}

/// Finish a league (League phase only).
#[post("/api/tournaments/{id}/finish")]
async fn api_finish_league(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, finish_league)
}

/// Enter the score of a pool match.
#[put("/api/tournaments/{id}/pools/{pool}/matches/{match_id}/score")]
async fn api_pool_score(state: AppState, path: Path<PoolMatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    let pool = match parse_pool(&path.pool) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    update_tournament(&state, path.id, |t| {
        record_pool_score(t, pool, &path.match_id, body.score_a, body.score_b)
    })
}

#[get("/api/tournaments/{id}/pools/{pool}/leaderboard")]
async fn api_pool_leaderboard(state: AppState, path: Path<PoolPath>) -> HttpResponse {
    let pool = match parse_pool(&path.pool) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    view_tournament(&state, path.id, |t| pool_leaderboard(t, pool))
}

/// Close the pools and seed the bracket (Pools phase only).
#[post("/api/tournaments/{id}/knockout/start")]
async fn api_start_knockout(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, start_knockout)
}

/// Set the winner of a match in the current knockout round.
#[put("/api/tournaments/{id}/knockout/matches/{match_id}/winner")]
async fn api_knockout_winner(state: AppState, path: Path<MatchPath>, body: Json<WinnerBody>) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        record_knockout_winner(t, &path.match_id, &body.winner)
    })
}

/// Advance to the next knockout round (final -> finished).
#[post("/api/tournaments/{id}/knockout/advance")]
async fn api_advance_knockout(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, advance_knockout)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_import_roster)
        .service(api_list_sessions)
        .service(api_clear_sessions)
        .service(api_create_session)
        .service(api_get_session)
        .service(api_delete_session)
        .service(api_reshuffle_session)
        .service(api_regenerate_session)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_delete_tournament)
        .service(api_rename_team)
        .service(api_league_score)
        .service(api_leaderboard)
        .service(api_finish_league)
        .service(api_pool_score)
        .service(api_pool_leaderboard)
        .service(api_start_knockout)
        .service(api_knockout_winner)
        .service(api_advance_knockout);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(Store::default()));

    // Background task: every 30 minutes, remove entries inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.tournaments.len() + g.sessions.len();
            g.tournaments
                .retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            g.sessions
                .retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - (g.tournaments.len() + g.sessions.len());
            if removed > 0 {
                log::info!("Cleaned up {} inactive entries (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn state() -> AppState {
        Data::new(RwLock::new(Store::default()))
    }

    #[actix_web::test]
    async fn league_flow_over_http() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Friday", "format": "league", "team_count": 2 }))
            .to_request();
        let t: Tournament = test::call_and_read_body_json(&app, req).await;
        assert_eq!(t.matches.len(), 1);

        let uri = format!("/api/tournaments/{}/matches/{}/score", t.id, t.matches[0].id);
        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(serde_json::json!({ "score_a": 2, "score_b": 0 }))
            .to_request();
        let scored: Tournament = test::call_and_read_body_json(&app, req).await;
        assert!(scored.matches[0].is_played());

        // second score on the same match is rejected
        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(serde_json::json!({ "score_a": 1, "score_b": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_tournament_is_404() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn session_with_too_few_players_is_rejected() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(serde_json::json!({
                "players": [{ "id": "p1", "name": "Ana" }],
                "policy": "balanced",
                "team_count": 2
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn tournament_history_lists_and_deletes() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Cup", "format": "league", "team_count": 3 }))
            .to_request();
        let t: Tournament = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/api/tournaments").to_request();
        let listed: Vec<TournamentSummary> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, t.id);
        assert_eq!(listed[0].team_count, 3);

        let uri = format!("/api/tournaments/{}", t.id);
        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn session_history_deletes_one_or_all() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let roster = serde_json::json!({
            "players": [
                { "id": "p1", "name": "Ana", "level": null },
                { "id": "p2", "name": "Bo", "position": null },
                { "id": "p3", "name": "Cy", "level": 4 },
                { "id": "p4", "name": "Di" }
            ],
            "team_count": 2
        });
        let mut ids = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/sessions")
                .set_json(&roster)
                .to_request();
            let s: Session = test::call_and_read_body_json(&app, req).await;
            ids.push(s.id);
        }

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{}", ids[0]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get().uri("/api/sessions").to_request();
        let listed: Vec<Session> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|s| s.id != ids[0]));
        assert!(listed[0].created_at >= listed[1].created_at);

        let req = test::TestRequest::delete().uri("/api/sessions").to_request();
        let cleared: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cleared["removed"], 2);

        let req = test::TestRequest::get().uri("/api/sessions").to_request();
        let listed: Vec<Session> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.is_empty());
    }
}
