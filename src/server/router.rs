//! HTTP and WebSocket routing configuration.
//!
//! Setup endpoints are plain JSON handlers; each game is watched through a
//! dedicated WebSocket actor.

use actix_web::web;
use crate::server::game_session::session::ws_game;
use crate::server::setup;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/generate-esl-questions")
            .route(web::post().to(setup::generate_questions))
    )
    .service(
        web::resource("/api/games")
            .route(web::post().to(setup::create_game))
    )
    .service(
        web::resource("/api/games/{game_id}")
            .route(web::get().to(setup::get_game))
    )
    .service(
        web::resource("/api/games/{game_id}/start")
            .route(web::post().to(setup::restart_game))
    )
    .service(
        web::resource("/ws/game/{game_id}")
            .to(ws_game)
    );
}
