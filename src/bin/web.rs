//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set DATA_FILE to a path to keep the league in a JSON snapshot across restarts.

use actix_files::Files;
use actix_web::{
    get, middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use pingpong_league::{api, LeagueStore};

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn serve_index() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);

    let store = match std::env::var("DATA_FILE") {
        Ok(path) if !path.trim().is_empty() => LeagueStore::open(path.trim()).map_err(|e| {
            log::error!("Could not open data file: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
        _ => {
            log::info!("DATA_FILE not set, keeping the league in memory only");
            LeagueStore::in_memory()
        }
    };
    let state = Data::new(store);

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .route("/", web::get().to(serve_index))
            .service(favicon)
            .configure(api::configure)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}
