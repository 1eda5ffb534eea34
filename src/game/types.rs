use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::game::{PLAYER_COLORS, PLAYER_NAMES, START_SQUARE};

/// One of the two fixed seats. Serialized as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// The seat that plays after this one.
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> u8 {
        id.index() as u8 + 1
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            other => Err(format!("no player {other}")),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    /// 1-based square index.
    pub position: usize,
    /// Last die value this player rolled, if any.
    pub last_roll: Option<u8>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            name: PLAYER_NAMES[id.index()].to_string(),
            color: PLAYER_COLORS[id.index()].to_string(),
            position: START_SQUARE,
            last_roll: None,
        }
    }
}

/// One answer choice and what happens when it is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(rename = "optionText")]
    pub label: String,
    #[serde(rename = "consequenceText")]
    pub consequence: String,
    #[serde(rename = "move")]
    pub move_delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "text")]
    pub prompt: String,
    pub options: [QuestionOption; 3],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("a deck needs at least one question")]
    Empty,
}

/// The questions for one session, in the order they are asked.
///
/// Never empty, and every question has exactly three options by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Deck(Vec<Question>);

impl Deck {
    pub fn new(questions: Vec<Question>) -> Result<Self, DeckError> {
        if questions.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Deck(questions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Question for a cursor value, wrapping past the end of the deck.
    pub fn cycled(&self, question_index: usize) -> (usize, &Question) {
        let slot = question_index % self.0.len();
        (slot, &self.0[slot])
    }

    pub fn get(&self, slot: usize) -> Option<&Question> {
        self.0.get(slot)
    }

    pub fn questions(&self) -> &[Question] {
        &self.0
    }
}

/// Student level, as offered by the setup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::A1, Level::A2, Level::B1, Level::B2, Level::C1];

    pub fn code(self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::A1 => "A1 - Beginner",
            Level::A2 => "A2 - Elementary",
            Level::B1 => "B1 - Pre-Intermediate",
            Level::B2 => "B2 - Intermediate",
            Level::C1 => "C1 - Upper-Intermediate",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = String;

    /// Accepts either the bare code ("B1") or the full label ("B1 - Pre-Intermediate").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().split_whitespace().next().unwrap_or("");
        Level::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| format!("unknown level {s:?}"))
    }
}

impl From<Level> for String {
    fn from(level: Level) -> String {
        level.label().to_string()
    }
}

impl TryFrom<String> for Level {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What the game is about; shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub topic: String,
    pub level: Level,
    pub structure: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    Rolling,
    DiceAnimating,
    Questioning,
    ConsequenceAnimating,
}

/// Whose turn it is and how many questions have been asked so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCursor {
    pub active: PlayerId,
    pub question_index: usize,
}

impl Default for TurnCursor {
    fn default() -> Self {
        Self { active: PlayerId::One, question_index: 0 }
    }
}

/// Consequence of a picked option, as shown in the middle of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequence {
    pub player: PlayerId,
    pub player_name: String,
    pub chosen_label: String,
    pub text: String,
    pub move_delta: i32,
}

/// Content of the centre panel, derived from engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CenterDisplay {
    Placeholder { text: String },
    QuestionPrompt { question: Question, player_name: String },
    Consequence(Consequence),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids_toggle() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other().other(), PlayerId::Two);
    }

    #[test]
    fn test_player_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PlayerId::Two).unwrap(), "2");
        let id: PlayerId = serde_json::from_str("1").unwrap();
        assert_eq!(id, PlayerId::One);
        assert!(serde_json::from_str::<PlayerId>("3").is_err());
    }

    #[test]
    fn test_level_parses_code_or_label() {
        assert_eq!("b2".parse::<Level>(), Ok(Level::B2));
        assert_eq!("C1 - Upper-Intermediate".parse::<Level>(), Ok(Level::C1));
        assert!("Z9".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert_eq!(Deck::new(vec![]), Err(DeckError::Empty));
    }

    #[test]
    fn test_deck_cycles_past_its_end() {
        let option = |label: &str| QuestionOption {
            label: label.to_string(),
            consequence: String::new(),
            move_delta: 0,
        };
        let question = |prompt: &str| Question {
            prompt: prompt.to_string(),
            options: [option("a"), option("b"), option("c")],
        };
        let deck = Deck::new(vec![question("first"), question("second")]).unwrap();

        assert_eq!(deck.cycled(1).0, 1);
        let (slot, replayed) = deck.cycled(4);
        assert_eq!(slot, 0);
        assert_eq!(replayed.prompt, "first");
    }
}
