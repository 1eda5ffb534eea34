//! Backend and turn engine for a two-player ESL board game.
//!
//! The game core (`game`) is synchronous and framework free; `server` wraps it
//! in actix actors, `question_source` fetches decks from a generative-language
//! API and `presentation` turns engine state into something drawable.

pub mod config;
pub mod game;
pub mod presentation;
pub mod question_source;
pub mod server;
