// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the game session manager address and the question source, shared
//! between HTTP/WebSocket handlers and the actor system.

use std::sync::Arc;

use actix::Addr;
use crate::question_source::QuestionSource;
use crate::server::game_session::server::GameSessionManager;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the game session manager actor.
    pub game_session_manager: Addr<GameSessionManager>,
    /// Where question decks come from.
    pub question_source: Arc<dyn QuestionSource>,
}

impl AppState {
    pub fn new(
        game_session_manager: Addr<GameSessionManager>,
        question_source: Arc<dyn QuestionSource>,
    ) -> Self {
        AppState {
            game_session_manager,
            question_source,
        }
    }
}
