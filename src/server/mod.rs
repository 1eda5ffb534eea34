// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the backend server components:
//! - Application state shared by every handler
//! - HTTP/WebSocket routing
//! - The setup boundary (question generation, game creation)
//! - Game session orchestration (turn engine actors, connected clients)

pub mod state;
pub mod router;
pub mod setup;
pub mod game_session;
pub mod ws_error;
