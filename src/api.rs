//! REST API: player and match endpoints over the shared [`LeagueStore`].

use crate::logic::{
    add_player, delete_match, delete_player, export_matches_csv, leaderboard, list_matches,
    list_players, match_view, matches_for_player, player_profile, recompute_player_stats,
    record_match, update_match, update_player, MatchUpdate, NewMatch, NewPlayer, PlayerUpdate,
};
use crate::models::{LeagueError, MatchId, PlayerId};
use crate::store::LeagueStore;
use actix_web::{
    delete, error, get,
    http::StatusCode,
    post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};

type AppState = Data<LeagueStore>;

impl ResponseError for LeagueError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeagueError::PlayerNotFound(_) | LeagueError::MatchNotFound(_) => StatusCode::NOT_FOUND,
            LeagueError::InvalidResult(_)
            | LeagueError::InvalidPlayer(_)
            | LeagueError::SamePlayer
            | LeagueError::PlayerDisabled(_) => StatusCode::BAD_REQUEST,
            LeagueError::DuplicateEmail | LeagueError::PlayerHasMatches(_) => StatusCode::CONFLICT,
            LeagueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("Request rejected: {}", self);
        }
        HttpResponse::build(status).json(MessageResponse {
            message: self.to_string(),
        })
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct PlayerSearch {
    search: Option<String>,
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pingpong-league",
    })
}

/// All players by win rate, optionally filtered by name.
#[get("/api/players")]
async fn api_list_players(
    state: AppState,
    query: Query<PlayerSearch>,
) -> Result<HttpResponse, LeagueError> {
    let players = state.read(|l| Ok(list_players(l, query.search.as_deref())))?;
    Ok(HttpResponse::Ok().json(players))
}

#[get("/api/players/leaderboard")]
async fn api_leaderboard(state: AppState) -> Result<HttpResponse, LeagueError> {
    let players = state.read(|l| Ok(leaderboard(l)))?;
    Ok(HttpResponse::Ok().json(players))
}

#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> Result<HttpResponse, LeagueError> {
    let player = state.read(|l| l.player(path.id).cloned())?;
    Ok(HttpResponse::Ok().json(player))
}

#[get("/api/players/{id}/profile")]
async fn api_player_profile(
    state: AppState,
    path: Path<PlayerPath>,
) -> Result<HttpResponse, LeagueError> {
    let profile = state.read(|l| player_profile(l, path.id))?;
    Ok(HttpResponse::Ok().json(profile))
}

#[post("/api/players")]
async fn api_create_player(
    state: AppState,
    body: Json<NewPlayer>,
) -> Result<HttpResponse, LeagueError> {
    let player = state
        .write(|l| {
            let id = add_player(l, body.into_inner())?;
            l.player(id).cloned()
        })
        .await?;
    Ok(HttpResponse::Created().json(player))
}

/// Edit name, email, avatar or disabled flag. Statistics fields are refused.
#[put("/api/players/{id}")]
async fn api_update_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<PlayerUpdate>,
) -> Result<HttpResponse, LeagueError> {
    let player = state
        .write(|l| {
            update_player(l, path.id, body.into_inner())?;
            l.player(path.id).cloned()
        })
        .await?;
    Ok(HttpResponse::Ok().json(player))
}

#[delete("/api/players/{id}")]
async fn api_delete_player(
    state: AppState,
    path: Path<PlayerPath>,
) -> Result<HttpResponse, LeagueError> {
    state.write(|l| delete_player(l, path.id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Player deleted".into(),
    }))
}

/// Repair path: recount a player's statistics from their match history.
#[post("/api/players/{id}/recompute")]
async fn api_recompute_player(
    state: AppState,
    path: Path<PlayerPath>,
) -> Result<HttpResponse, LeagueError> {
    let player = state
        .write(|l| {
            recompute_player_stats(l, path.id)?;
            l.player(path.id).cloned()
        })
        .await?;
    Ok(HttpResponse::Ok().json(player))
}

#[get("/api/matches")]
async fn api_list_matches(state: AppState) -> Result<HttpResponse, LeagueError> {
    let matches = state.read(list_matches)?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/api/matches/export")]
async fn api_export_matches(state: AppState) -> Result<HttpResponse, LeagueError> {
    let csv = state.read(export_matches_csv)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"matches.csv\""))
        .body(csv))
}

#[get("/api/matches/player/{id}")]
async fn api_player_matches(
    state: AppState,
    path: Path<PlayerPath>,
) -> Result<HttpResponse, LeagueError> {
    let matches = state.read(|l| matches_for_player(l, path.id))?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> Result<HttpResponse, LeagueError> {
    let view = state.read(|l| match_view(l, path.id))?;
    Ok(HttpResponse::Ok().json(view))
}

/// Record a match; a completed result updates both players' statistics.
#[post("/api/matches")]
async fn api_create_match(
    state: AppState,
    body: Json<NewMatch>,
) -> Result<HttpResponse, LeagueError> {
    let view = state
        .write(|l| {
            let id = record_match(l, body.into_inner())?;
            match_view(l, id)
        })
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[put("/api/matches/{id}")]
async fn api_update_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<MatchUpdate>,
) -> Result<HttpResponse, LeagueError> {
    let view = state
        .write(|l| {
            update_match(l, path.id, body.into_inner())?;
            match_view(l, path.id)
        })
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(
    state: AppState,
    path: Path<MatchPath>,
) -> Result<HttpResponse, LeagueError> {
    state.write(|l| delete_match(l, path.id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Match deleted".into(),
    }))
}

/// Malformed JSON bodies get the same `{"message": ...}` shape as league errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("Rejected request body: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(MessageResponse { message }),
        )
        .into()
    })
}

/// Register every API route. Fixed paths come before `{id}` paths so they are matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(api_health)
        .service(api_list_players)
        .service(api_leaderboard)
        .service(api_get_player)
        .service(api_player_profile)
        .service(api_create_player)
        .service(api_update_player)
        .service(api_delete_player)
        .service(api_recompute_player)
        .service(api_list_matches)
        .service(api_export_matches)
        .service(api_player_matches)
        .service(api_get_match)
        .service(api_create_match)
        .service(api_update_match)
        .service(api_delete_match);
}
