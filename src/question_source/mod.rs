//! Question source.
//!
//! Produces the deck for a game from the setup form. The real implementation
//! asks a generative-language API; every implementation hands back a fully
//! validated [`Deck`] or an error, never a partial deck.

pub mod gemini;
pub mod validate;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::types::{Deck, GameSettings, Level};

pub use gemini::GeminiSource;
pub use validate::{parse_deck, MalformedDeck};

/// What to generate questions about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub topic: String,
    pub level: Level,
    pub structure: String,
    pub count: usize,
}

impl QuestionRequest {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            topic: self.topic.clone(),
            level: self.level,
            structure: self.structure.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuestionSourceError {
    #[error("question generation is not configured: {0}")]
    Config(String),
    #[error("could not reach the question service: {0}")]
    Network(String),
    #[error("question service answered with status {status}")]
    Status { status: u16, body: String },
    #[error("question service sent something that is not JSON: {0}")]
    Unparseable(String),
    #[error("question service sent malformed questions: {0}")]
    Malformed(#[from] MalformedDeck),
}

#[async_trait(?Send)]
pub trait QuestionSource: Send + Sync {
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Deck, QuestionSourceError>;
}

/// Stands in when no API key is configured; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSource;

#[async_trait(?Send)]
impl QuestionSource for UnconfiguredSource {
    async fn generate_questions(
        &self,
        _request: &QuestionRequest,
    ) -> Result<Deck, QuestionSourceError> {
        Err(QuestionSourceError::Config("GEMINI_API_KEY is not set".to_string()))
    }
}

/// Serves the same deck for every request.
#[derive(Debug, Clone)]
pub struct StaticSource {
    deck: Deck,
}

impl StaticSource {
    pub fn new(deck: Deck) -> Self {
        Self { deck }
    }
}

#[async_trait(?Send)]
impl QuestionSource for StaticSource {
    async fn generate_questions(
        &self,
        _request: &QuestionRequest,
    ) -> Result<Deck, QuestionSourceError> {
        Ok(self.deck.clone())
    }
}
