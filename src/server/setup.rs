//! Setup boundary.
//!
//! HTTP handlers that turn the setup form into a deck and a running game.
//! Every question-source failure stops here and becomes a JSON error for the
//! setup screen; a session only ever receives a fully validated deck.

use actix::Addr;
use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config::question_source::{DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT};
use crate::game::types::{Deck, GamePhase, GameSettings, Level};
use crate::question_source::{QuestionRequest, QuestionSourceError};
use crate::server::game_session::messages::{GetSnapshot, StartGame};
use crate::server::game_session::server::{CreateGame, GameSession, GetGameSession};
use crate::server::state::AppState;
use crate::server::ws_error::http_error_response;

/// Body of every setup request. Missing fields are reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetupForm {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub structure: String,
    pub count: Option<usize>,
}

impl SetupForm {
    pub fn into_request(self) -> Result<QuestionRequest, SetupError> {
        let topic = self.topic.trim();
        let level = self.level.trim();
        let structure = self.structure.trim();
        if topic.is_empty() || level.is_empty() || structure.is_empty() {
            return Err(SetupError::MissingFields);
        }
        let level: Level = level.parse().map_err(|_| SetupError::InvalidLevel(level.to_string()))?;
        let count = self.count.unwrap_or(DEFAULT_QUESTION_COUNT);
        if !(1..=MAX_QUESTION_COUNT).contains(&count) {
            return Err(SetupError::InvalidCount { max: MAX_QUESTION_COUNT });
        }
        Ok(QuestionRequest {
            topic: topic.to_string(),
            level,
            structure: structure.to_string(),
            count,
        })
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Topic, level, and structure are required.")]
    MissingFields,
    #[error("Unknown student level {0:?}.")]
    InvalidLevel(String),
    #[error("Question count must be between 1 and {max}.")]
    InvalidCount { max: usize },
    #[error(transparent)]
    Source(#[from] QuestionSourceError),
    #[error("Game {0} does not exist.")]
    GameNotFound(Uuid),
    #[error("This game is already running; reset it before starting a new one.")]
    NotInSetup,
    #[error("The game service is unavailable.")]
    Unavailable,
}

impl SetupError {
    fn code(&self) -> &'static str {
        match self {
            SetupError::MissingFields
            | SetupError::InvalidLevel(_)
            | SetupError::InvalidCount { .. } => "INVALID_SETUP",
            SetupError::Source(QuestionSourceError::Config(_)) => "CONFIGURATION_ERROR",
            SetupError::Source(
                QuestionSourceError::Network(_) | QuestionSourceError::Status { .. },
            ) => "QUESTION_SOURCE_UNAVAILABLE",
            SetupError::Source(
                QuestionSourceError::Unparseable(_) | QuestionSourceError::Malformed(_),
            ) => "MALFORMED_RESPONSE",
            SetupError::GameNotFound(_) => "GAME_NOT_FOUND",
            SetupError::NotInSetup => "GAME_ALREADY_RUNNING",
            SetupError::Unavailable => "UNAVAILABLE",
        }
    }
}

impl ResponseError for SetupError {
    fn status_code(&self) -> StatusCode {
        match self {
            SetupError::MissingFields
            | SetupError::InvalidLevel(_)
            | SetupError::InvalidCount { .. } => StatusCode::BAD_REQUEST,
            SetupError::Source(QuestionSourceError::Config(_)) | SetupError::Unavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SetupError::Source(_) => StatusCode::BAD_GATEWAY,
            SetupError::GameNotFound(_) => StatusCode::NOT_FOUND,
            SetupError::NotInSetup => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let context = match self {
            SetupError::GameNotFound(id) => Some(json!({ "game_id": id })),
            SetupError::InvalidLevel(_) => Some(json!({
                "levels": Level::ALL.iter().map(|l| l.label()).collect::<Vec<_>>()
            })),
            _ => None,
        };
        http_error_response(self.code(), &self.to_string(), context, self.status_code())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameCreated {
    pub game_id: Uuid,
    pub deck_len: usize,
    pub settings: GameSettings,
}

async fn fetch_deck(state: &AppState, request: &QuestionRequest) -> Result<Deck, SetupError> {
    info!(
        "[Setup] Requesting {} questions on {:?} ({})",
        request.count, request.topic, request.level.code()
    );
    state
        .question_source
        .generate_questions(request)
        .await
        .map_err(|e| {
            error!("[Setup] Question source failed: {}", e);
            SetupError::from(e)
        })
}

async fn find_session(state: &AppState, game_id: Uuid) -> Result<Addr<GameSession>, SetupError> {
    state
        .game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(|_| SetupError::Unavailable)?
        .ok_or(SetupError::GameNotFound(game_id))
}

/// `POST /api/generate-esl-questions`: the question proxy on its own.
pub async fn generate_questions(
    state: web::Data<AppState>,
    form: web::Json<SetupForm>,
) -> Result<HttpResponse, SetupError> {
    let request = form.into_inner().into_request()?;
    let deck = fetch_deck(&state, &request).await?;
    info!("[Setup] Successfully generated {} questions", deck.len());
    Ok(HttpResponse::Ok().json(deck))
}

/// `POST /api/games`: fetch a deck and, only if that worked, start a game.
pub async fn create_game(
    state: web::Data<AppState>,
    form: web::Json<SetupForm>,
) -> Result<HttpResponse, SetupError> {
    let request = form.into_inner().into_request()?;
    let deck = fetch_deck(&state, &request).await?;
    let deck_len = deck.len();
    let settings = request.settings();

    let game_id = state
        .game_session_manager
        .send(CreateGame { deck, settings: settings.clone() })
        .await
        .map_err(|_| SetupError::Unavailable)?
        .map_err(|_| SetupError::NotInSetup)?;

    Ok(HttpResponse::Created().json(GameCreated { game_id, deck_len, settings }))
}

/// `POST /api/games/{game_id}/start`: new deck for a session that was reset.
pub async fn restart_game(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Json<SetupForm>,
) -> Result<HttpResponse, SetupError> {
    let game_id = path.into_inner();
    let request = form.into_inner().into_request()?;
    let session = find_session(&state, game_id).await?;

    // Fail fast instead of generating a deck nobody can use.
    let snapshot = session.send(GetSnapshot).await.map_err(|_| SetupError::Unavailable)?;
    if snapshot.phase != GamePhase::Setup {
        return Err(SetupError::NotInSetup);
    }

    let deck = fetch_deck(&state, &request).await?;
    let deck_len = deck.len();
    let settings = request.settings();
    session
        .send(StartGame { deck, settings: settings.clone() })
        .await
        .map_err(|_| SetupError::Unavailable)?
        .map_err(|_| SetupError::NotInSetup)?;

    Ok(HttpResponse::Ok().json(GameCreated { game_id, deck_len, settings }))
}

/// `GET /api/games/{game_id}`: current engine snapshot.
pub async fn get_game(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, SetupError> {
    let session = find_session(&state, path.into_inner()).await?;
    let snapshot = session.send(GetSnapshot).await.map_err(|_| SetupError::Unavailable)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(topic: &str, level: &str, structure: &str, count: Option<usize>) -> SetupForm {
        SetupForm {
            topic: topic.to_string(),
            level: level.to_string(),
            structure: structure.to_string(),
            count,
        }
    }

    #[test]
    fn test_form_defaults_to_forty_questions() {
        let request = form("Food", "A1 - Beginner", "I like...", None).into_request().unwrap();
        assert_eq!(request.count, 40);
        assert_eq!(request.level, Level::A1);
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let err = form("Food", "A1", "   ", None).into_request().unwrap_err();
        assert!(matches!(err, SetupError::MissingFields));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_level_and_bad_count() {
        assert!(matches!(
            form("Food", "Z9", "can", None).into_request(),
            Err(SetupError::InvalidLevel(_))
        ));
        assert!(matches!(
            form("Food", "B1", "can", Some(0)).into_request(),
            Err(SetupError::InvalidCount { .. })
        ));
        assert!(matches!(
            form("Food", "B1", "can", Some(101)).into_request(),
            Err(SetupError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_source_errors_map_to_statuses() {
        let config = SetupError::from(QuestionSourceError::Config("no key".into()));
        assert_eq!(config.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(config.code(), "CONFIGURATION_ERROR");

        let malformed = SetupError::from(QuestionSourceError::Unparseable("nope".into()));
        assert_eq!(malformed.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(malformed.code(), "MALFORMED_RESPONSE");

        let down = SetupError::from(QuestionSourceError::Status {
            status: 500,
            body: String::new(),
        });
        assert_eq!(down.code(), "QUESTION_SOURCE_UNAVAILABLE");
    }
}
