//! HTTP tests: routes, status codes and response shapes.

use actix_web::{http::StatusCode, test, web::Data, App};
use pingpong_league::{api, LeagueStore};
use serde_json::{json, Value};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(LeagueStore::in_memory()))
                .configure(api::configure),
        )
        .await
    };
}

macro_rules! create_player {
    ($app:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(json!({ "name": $name }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn health() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn create_match_returns_populated_match_and_updates_players() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({
            "player1Id": a,
            "player2Id": b,
            "player1Score": 11,
            "player2Score": 5,
            "playedAt": "2024-05-16T14:30:00Z"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let m: Value = test::read_body_json(resp).await;
    assert_eq!(m["status"], "completed");
    assert_eq!(m["player1"]["name"], "Alex");
    assert_eq!(m["player2"]["name"], "Morgan");
    assert_eq!(m["winner"], a.as_str());
    assert_eq!(m["player1Score"], 11);

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{}", a))
        .to_request();
    let pa: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pa["rating"], 1016);
    assert_eq!(pa["wins"], 1);
    assert_eq!(pa["matchesPlayed"], 1);
    assert_eq!(pa["winRate"], 100.0);
    assert_eq!(pa["pointsScored"], 11);
}

#[actix_web::test]
async fn tie_is_a_bad_request() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");

    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({
            "player1Id": a,
            "player2Id": b,
            "player1Score": 10,
            "player2Score": 10
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("tie"));

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let matches: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn statistics_cannot_be_overwritten_through_player_update() {
    let app = app!();
    let a = create_player!(app, "Alex");

    let req = test::TestRequest::put()
        .uri(&format!("/api/players/{}", a))
        .set_json(json!({ "wins": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    let req = test::TestRequest::put()
        .uri(&format!("/api/players/{}", a))
        .set_json(json!({ "name": "Alexandra", "disabled": true }))
        .to_request();
    let p: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(p["name"], "Alexandra");
    assert_eq!(p["disabled"], true);
    assert_eq!(p["wins"], 0);
}

#[actix_web::test]
async fn unknown_ids_are_not_found() {
    let app = app!();
    let id = uuid::Uuid::new_v4();
    for uri in [
        format!("/api/players/{}", id),
        format!("/api/matches/{}", id),
        format!("/api/players/{}/profile", id),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }
}

#[actix_web::test]
async fn delete_match_recomputes_players() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");

    let mut ids = Vec::new();
    for (s1, s2) in [(11, 4), (6, 11)] {
        let req = test::TestRequest::post()
            .uri("/api/matches")
            .set_json(json!({
                "player1Id": a,
                "player2Id": b,
                "player1Score": s1,
                "player2Score": s2
            }))
            .to_request();
        let m: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(m["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/matches/{}", ids[1]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Match deleted");

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{}", a))
        .to_request();
    let pa: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pa["wins"], 1);
    assert_eq!(pa["losses"], 0);
    assert_eq!(pa["winRate"], 100.0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/matches/player/{}", b))
        .to_request();
    let matches: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn player_with_matches_cannot_be_deleted() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");
    let req = test::TestRequest::post()
        .uri("/api/matches")
        .set_json(json!({
            "player1Id": a,
            "player2Id": b,
            "player1Score": 11,
            "player2Score": 2
        }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/players/{}", a))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn fixed_routes_are_not_taken_as_ids() {
    let app = app!();
    create_player!(app, "Alex");

    let req = test::TestRequest::get()
        .uri("/api/players/leaderboard")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let board: Value = test::read_body_json(resp).await;
    assert_eq!(board.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/matches/export")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let csv = test::read_body(resp).await;
    assert!(csv.starts_with(b"id,played_at,status"));
}

macro_rules! record {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/matches")
            .set_json($body)
            .to_request();
        let m: Value = test::call_and_read_body_json(&$app, req).await;
        m["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn failed_snapshot_write_is_not_applied() {
    let path = std::env::temp_dir()
        .join(uuid::Uuid::new_v4().to_string())
        .join("league.json");
    let app = test::init_service(
        App::new()
            .app_data(Data::new(LeagueStore::open(&path).unwrap()))
            .configure(api::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/players")
        .set_json(json!({ "name": "Alex" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let req = test::TestRequest::get().uri("/api/players").to_request();
    let players: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(players.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn update_match_edits_score_and_recomputes() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");
    let first = record!(app, json!({
        "player1Id": a,
        "player2Id": b,
        "player1Score": 11,
        "player2Score": 5
    }));

    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{}", first))
        .set_json(json!({ "player1Score": 11, "player2Score": 9 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let m: Value = test::read_body_json(resp).await;
    assert_eq!(m["player2Score"], 9);
    assert_eq!(m["winner"], a.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{}", b))
        .to_request();
    let pb: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pb["pointsScored"], 9);
    assert_eq!(pb["losses"], 1);
    assert_eq!(pb["rating"], 984);
}

#[actix_web::test]
async fn update_match_rejects_ties_and_unknown_fields() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");
    let id = record!(app, json!({
        "player1Id": a,
        "player2Id": b,
        "player1Score": 11,
        "player2Score": 5
    }));

    for body in [
        json!({ "player1Score": 5, "player2Score": 5 }),
        json!({ "status": "scheduled" }),
    ] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/matches/{}", id))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", body);
        let err: Value = test::read_body_json(resp).await;
        assert!(err["message"].is_string());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/matches/{}", id))
        .to_request();
    let m: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(m["status"], "completed");
    assert_eq!(m["player2Score"], 5);

    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{}", uuid::Uuid::new_v4()))
        .set_json(json!({ "player1Score": 11, "player2Score": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn recompute_endpoint_returns_recounted_player() {
    let app = app!();
    let a = create_player!(app, "Alex");
    let b = create_player!(app, "Morgan");
    for (s1, s2) in [(11, 4), (6, 11), (11, 8)] {
        record!(app, json!({
            "player1Id": a,
            "player2Id": b,
            "player1Score": s1,
            "player2Score": s2
        }));
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/players/{}/recompute", a))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pa: Value = test::read_body_json(resp).await;
    assert_eq!(pa["wins"], 2);
    assert_eq!(pa["losses"], 1);
    assert_eq!(pa["matchesPlayed"], 3);
    assert_eq!(pa["pointsScored"], 28);

    let req = test::TestRequest::post()
        .uri(&format!("/api/players/{}/recompute", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
