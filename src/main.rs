//! Main entry point for the backend server.
//!
//! Reads settings, picks the question source, starts the game session manager
//! and launches the HTTP server with the setup and WebSocket endpoints.

use std::sync::Arc;

use actix::Actor;
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::{error, info};

use esl_board::config::game::{BOARD_HEIGHT, BOARD_WIDTH};
use esl_board::config::Settings;
use esl_board::game::board::Board;
use esl_board::question_source::{GeminiSource, QuestionSource, UnconfiguredSource};
use esl_board::server::game_session::server::GameSessionManager;
use esl_board::server::{router, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let question_source: Arc<dyn QuestionSource> = match &settings.api_key {
        Some(key) => {
            info!("[Server] Using model {} at {}", settings.model, settings.api_base);
            Arc::new(GeminiSource::new(
                key.clone(),
                settings.api_base.clone(),
                settings.model.clone(),
            ))
        }
        None => {
            error!("[Server] GEMINI_API_KEY is not set; question generation will fail until it is");
            Arc::new(UnconfiguredSource)
        }
    };

    let board = Board::new(BOARD_WIDTH, BOARD_HEIGHT)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // Start the GameSessionManager actor (handles all game sessions).
    let game_session_manager = GameSessionManager::new(board).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(AppState::new(game_session_manager, question_source));

    let allowed_origins = settings.allowed_origins.clone();
    info!(
        "[Server] Listening on {}:{} (origins: {})",
        settings.bind_host,
        settings.port,
        allowed_origins.join(", ")
    );

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(router::config)
    })
    .bind((settings.bind_host.as_str(), settings.port))?
    .run()
    .await
}
