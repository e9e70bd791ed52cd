//! Single binary web server: REST API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT (see `config`).

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;
use tournament_manager::config::ServerConfig;
use tournament_manager::{
    EngineError, EngineEvent, GameMatch, MatchId, MatchOutcome, MemoryStore, Progress, Team,
    TeamId, Tournament, TournamentContext, TournamentEngine, TournamentFormat, TournamentId,
};

/// Per-tournament entry: engine over its own store + last activity time (for auto-cleanup).
struct TournamentEntry {
    engine: TournamentEngine<MemoryStore>,
    ctx: TournamentContext,
    last_activity: Instant,
}

/// Tournaments by id. The map lock is only held for lookups; each tournament has its own
/// mutex so results for different tournaments never wait on each other.
type Registry = RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>;
type AppState = Data<Registry>;

/// Session key holding the tournament the caller has loaded. Display only: handlers that
/// change a tournament take its id from the path and use the context stored in its entry.
const SESSION_TOURNAMENT: &str = "tournament_id";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
    start_date: NaiveDate,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct RecordResultBody {
    outcome: MatchOutcome,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Serialize)]
struct TournamentView {
    tournament: Tournament,
    teams: Vec<Team>,
    champion_name: Option<String>,
}

/// A match with team names attached for display.
#[derive(Serialize)]
struct FixtureView {
    #[serde(flatten)]
    game: GameMatch,
    team_1_name: String,
    team_2_name: String,
    winner_name: Option<String>,
}

#[derive(Serialize)]
struct RecordResultResponse {
    progress: Progress,
    champion_name: Option<String>,
}

fn error_response(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EngineError::TournamentNotFound(_)
        | EngineError::MatchNotFound(_)
        | EngineError::TeamNotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::AlreadyGenerated
        | EngineError::AlreadyResolved(_)
        | EngineError::DuplicateTeamName
        | EngineError::RosterFrozen => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Lock one tournament, refresh its activity time and run `f` on it.
fn with_entry<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut TournamentEntry) -> HttpResponse,
{
    let entry = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        match g.get(&id) {
            Some(e) => Arc::clone(e),
            None => return no_tournament(),
        }
    };
    let mut entry = match entry.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    entry.last_activity = Instant::now();
    f(&mut entry)
}

fn team_names(entry: &TournamentEntry) -> HashMap<TeamId, String> {
    entry
        .engine
        .teams(&entry.ctx)
        .unwrap_or_default()
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect()
}

fn tournament_view(entry: &TournamentEntry) -> Result<TournamentView, EngineError> {
    let tournament = entry.engine.tournament(&entry.ctx)?;
    let teams = entry.engine.teams(&entry.ctx)?;
    let champion_name = tournament
        .champion()
        .and_then(|c| teams.iter().find(|t| t.id == c))
        .map(|t| t.name.clone());
    Ok(TournamentView {
        tournament,
        teams,
        champion_name,
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-manager",
    })
}

/// Create a tournament with its own store (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut engine = TournamentEngine::new(MemoryStore::new());
    engine.subscribe(|event: &EngineEvent| {
        if let EngineEvent::ChampionDeclared { tournament_id, champion } = event {
            log::info!("Champion declared in {}: team {}", tournament_id, champion);
        }
    });
    let ctx = match engine.create_tournament(&body.name, body.format, body.start_date) {
        Ok(ctx) => ctx,
        Err(e) => return error_response(&e),
    };
    let entry = TournamentEntry {
        engine,
        ctx,
        last_activity: Instant::now(),
    };
    let view = match tournament_view(&entry) {
        Ok(v) => v,
        Err(e) => return error_response(&e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(ctx.tournament_id, Arc::new(Mutex::new(entry)));
    HttpResponse::Ok().json(view)
}

/// List all tournaments (selection screen).
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let entries: Vec<_> = match state.read() {
        Ok(g) => g.values().cloned().collect(),
        Err(_) => return lock_error(),
    };
    let mut tournaments: Vec<Tournament> = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = match entry.lock() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        tournaments.extend(entry.engine.list_tournaments());
    }
    tournaments.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.name.cmp(&b.name)));
    HttpResponse::Ok().json(tournaments)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| match tournament_view(entry) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    })
}

/// Delete a tournament with all its teams, fixtures and standings.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>, session: Session) -> HttpResponse {
    let removed = match state.write() {
        Ok(mut g) => g.remove(&path.id),
        Err(_) => return lock_error(),
    };
    let entry = match removed {
        Some(e) => e,
        None => return no_tournament(),
    };
    let mut entry = match entry.lock() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let ctx = entry.ctx;
    if let Err(e) = entry.engine.delete_tournament(ctx) {
        return error_response(&e);
    }
    if let Ok(Some(loaded)) = session.get::<TournamentId>(SESSION_TOURNAMENT) {
        if loaded == path.id {
            session.remove(SESSION_TOURNAMENT);
        }
    }
    HttpResponse::NoContent().finish()
}

/// Load a tournament into the caller's session.
#[post("/api/tournaments/{id}/load")]
async fn api_load_tournament(state: AppState, path: Path<TournamentPath>, session: Session) -> HttpResponse {
    let id = path.id;
    with_entry(&state, id, |entry| {
        let ctx = match entry.engine.load(id) {
            Ok(ctx) => ctx,
            Err(e) => return error_response(&e),
        };
        if session.insert(SESSION_TOURNAMENT, ctx.tournament_id).is_err() {
            return HttpResponse::InternalServerError().body("session error");
        }
        log::info!("Session loaded tournament {}", id);
        match tournament_view(entry) {
            Ok(view) => HttpResponse::Ok().json(view),
            Err(e) => error_response(&e),
        }
    })
}

/// The tournament loaded in this session (404 if none).
#[get("/api/session")]
async fn api_session(state: AppState, session: Session) -> HttpResponse {
    match session.get::<TournamentId>(SESSION_TOURNAMENT) {
        Ok(Some(id)) => with_entry(&state, id, |entry| match tournament_view(entry) {
            Ok(view) => HttpResponse::Ok().json(view),
            Err(e) => error_response(&e),
        }),
        Ok(None) => no_tournament(),
        Err(_) => HttpResponse::BadRequest().body("invalid session"),
    }
}

#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<TournamentPath>, body: Json<AddTeamBody>) -> HttpResponse {
    with_entry(&state, path.id, |entry| {
        match entry.engine.add_team(&entry.ctx, &body.name) {
            Ok(team) => HttpResponse::Ok().json(team),
            Err(e) => error_response(&e),
        }
    })
}

#[get("/api/tournaments/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| match entry.engine.teams(&entry.ctx) {
        Ok(teams) => HttpResponse::Ok().json(teams),
        Err(e) => error_response(&e),
    })
}

/// Import teams from a CSV body with a `name` column.
#[post("/api/tournaments/{id}/teams/import")]
async fn api_import_teams(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    with_entry(&state, path.id, |entry| {
        match entry.engine.import_teams(&entry.ctx, body.as_bytes()) {
            Ok(teams) => HttpResponse::Ok().json(teams),
            Err(e) => error_response(&e),
        }
    })
}

/// Generate fixtures (round-robin schedule or knockout round 1).
#[post("/api/tournaments/{id}/fixtures")]
async fn api_generate_fixtures(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| {
        let ctx = entry.ctx;
        match entry.engine.generate_fixtures(&ctx) {
            Ok(_) => HttpResponse::Ok().json(fixture_views(entry)),
            Err(e) => error_response(&e),
        }
    })
}

fn fixture_views(entry: &TournamentEntry) -> Vec<FixtureView> {
    let names = team_names(entry);
    let name_of = |id: TeamId| names.get(&id).cloned().unwrap_or_default();
    entry
        .engine
        .fixtures(&entry.ctx)
        .into_iter()
        .map(|game| FixtureView {
            team_1_name: name_of(game.team_1),
            team_2_name: name_of(game.team_2),
            winner_name: game.winner.map(&name_of),
            game,
        })
        .collect()
}

#[get("/api/tournaments/{id}/fixtures")]
async fn api_get_fixtures(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| HttpResponse::Ok().json(fixture_views(entry)))
}

/// Record a match result; knockout tournaments advance their bracket in the same request.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let match_id = path.match_id;
    with_entry(&state, path.id, |entry| {
        let ctx = entry.ctx;
        match entry.engine.record_result(&ctx, match_id, body.outcome) {
            Ok(progress) => {
                let champion_name = match &progress {
                    Progress::ChampionDeclared { champion } | Progress::Finished { champion } => {
                        team_names(entry).remove(champion)
                    }
                    _ => None,
                };
                HttpResponse::Ok().json(RecordResultResponse {
                    progress,
                    champion_name,
                })
            }
            Err(e) => error_response(&e),
        }
    })
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| {
        HttpResponse::Ok().json(entry.engine.standings(&entry.ctx))
    })
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| {
        let mut out = Vec::new();
        match entry.engine.export_standings(&entry.ctx, &mut out) {
            Ok(()) => HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .body(out),
            Err(e) => error_response(&e),
        }
    })
}

/// Zero all standings counters; fixtures and results are kept.
#[post("/api/tournaments/{id}/standings/reset")]
async fn api_reset_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |entry| {
        let ctx = entry.ctx;
        match entry.engine.reset_standings(&ctx) {
            Ok(()) => HttpResponse::Ok().json(entry.engine.standings(&ctx)),
            Err(e) => error_response(&e),
        }
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let key = match &config.session_key {
        Some(bytes) => Key::from(bytes),
        None => Key::generate(),
    };

    let state: AppState = Data::new(RwLock::new(HashMap::new()));

    // Background task: periodically remove tournaments nobody has touched for a while
    let state_cleanup = state.clone();
    let inactivity_timeout = config.inactivity_timeout;
    let cleanup_interval = config.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| match entry.lock() {
                Ok(e) => e.last_activity.elapsed() < inactivity_timeout,
                Err(_) => false,
            });
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {:?})",
                    removed,
                    inactivity_timeout
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_load_tournament)
            .service(api_session)
            .service(api_add_team)
            .service(api_list_teams)
            .service(api_import_teams)
            .service(api_generate_fixtures)
            .service(api_get_fixtures)
            .service(api_record_result)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_reset_standings)
            .default_service(web::to(|| async { HttpResponse::NotFound().finish() }))
    })
    .bind(bind)?
    .run()
    .await
}
