//! View model sent to clients.
//!
//! A `BoardView` is a pure function of engine state: clients draw it and send
//! intents back, they never keep game state of their own.

use serde::{Deserialize, Serialize};

use crate::game::board::{Cell, SquareKind};
use crate::game::engine::TurnEngine;
use crate::game::types::{CenterDisplay, GamePhase, GameSettings, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareView {
    pub index: usize,
    pub cell: Cell,
    pub kind: SquareKind,
    /// Players standing on this square.
    pub tokens: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPanel {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub position: usize,
    pub dice: Option<u8>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionButton {
    pub slot: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub roll_enabled: bool,
    pub roll_label: String,
    pub dice_face: String,
    /// Cursor value to send back with a picked option.
    pub question_index: usize,
    pub options: Vec<OptionButton>,
    pub options_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub phase: GamePhase,
    pub settings: Option<GameSettings>,
    pub squares: Vec<SquareView>,
    pub players: Vec<PlayerPanel>,
    pub center: CenterDisplay,
    pub controls: Controls,
}

/// Glyph for a die value; a plain die when nothing has been rolled.
pub fn dice_face(value: Option<u8>) -> &'static str {
    match value {
        Some(1) => "⚀",
        Some(2) => "⚁",
        Some(3) => "⚂",
        Some(4) => "⚃",
        Some(5) => "⚄",
        Some(6) => "⚅",
        _ => "🎲",
    }
}

impl BoardView {
    pub fn from_engine(engine: &TurnEngine) -> Self {
        let board = engine.board();
        let phase = engine.phase();
        let cursor = engine.cursor();

        let squares = board
            .squares()
            .map(|(index, cell)| SquareView {
                index,
                cell,
                kind: board.square_kind(index),
                tokens: engine
                    .players()
                    .iter()
                    .filter(|p| p.position == index)
                    .map(|p| p.id)
                    .collect(),
            })
            .collect();

        // Highlight the active player only while they have something to do.
        let highlight = matches!(phase, GamePhase::Rolling | GamePhase::Questioning);
        let players = engine
            .players()
            .iter()
            .map(|p| PlayerPanel {
                id: p.id,
                name: p.name.clone(),
                color: p.color.clone(),
                position: p.position,
                dice: p.last_roll,
                active: highlight && p.id == cursor.active,
            })
            .collect();

        let roll_enabled = phase == GamePhase::Rolling;
        let roll_label = match engine.active_player() {
            Some(player) if roll_enabled => format!("{}, Roll Dice!", player.name),
            _ => "Waiting...".to_string(),
        };

        let options = engine
            .current_question()
            .map(|q| {
                q.options
                    .iter()
                    .enumerate()
                    .map(|(slot, o)| OptionButton { slot, label: o.label.clone() })
                    .collect()
            })
            .unwrap_or_default();

        BoardView {
            width: board.width(),
            height: board.height(),
            phase,
            settings: engine.settings().cloned(),
            squares,
            players,
            center: engine.center_display(),
            controls: Controls {
                roll_enabled,
                roll_label,
                dice_face: dice_face(engine.current_roll()).to_string(),
                question_index: cursor.question_index,
                options,
                options_enabled: phase == GamePhase::Questioning,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;
    use crate::game::dice::LoadedDie;
    use crate::game::types::{Deck, Level, Question, QuestionOption};

    fn engine() -> TurnEngine {
        let option = |label: &str| QuestionOption {
            label: label.to_string(),
            consequence: "ok".to_string(),
            move_delta: 1,
        };
        let deck = Deck::new(vec![Question {
            prompt: "Where do you live?".to_string(),
            options: [option("I live in Lyon."), option("Lyon."), option("I living Lyon.")],
        }])
        .unwrap();
        let mut engine = TurnEngine::new(Board::new(15, 5).unwrap());
        engine
            .start_game(
                deck,
                GameSettings {
                    topic: "Home".into(),
                    level: Level::A2,
                    structure: "present simple".into(),
                },
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_rolling_view() {
        let view = BoardView::from_engine(&engine());
        assert_eq!(view.squares.len(), 36);
        assert_eq!(view.squares[0].tokens, vec![PlayerId::One, PlayerId::Two]);
        assert!(view.controls.roll_enabled);
        assert_eq!(view.controls.roll_label, "Player 1, Roll Dice!");
        assert_eq!(view.controls.dice_face, "🎲");
        assert!(view.controls.options.is_empty());
        assert!(view.players[0].active && !view.players[1].active);
    }

    #[test]
    fn test_animating_view_disables_everything() {
        let mut engine = engine();
        engine.roll_dice(&mut LoadedDie::new([5])).unwrap();
        let view = BoardView::from_engine(&engine);
        assert!(!view.controls.roll_enabled);
        assert_eq!(view.controls.roll_label, "Waiting...");
        assert_eq!(view.controls.dice_face, "⚄");
        assert!(view.players.iter().all(|p| !p.active));
    }

    #[test]
    fn test_questioning_view_offers_options() {
        let mut engine = engine();
        let step = engine.roll_dice(&mut LoadedDie::new([2])).unwrap();
        engine.fire(step.next.unwrap()).unwrap();
        let view = BoardView::from_engine(&engine);
        assert!(view.controls.options_enabled);
        assert_eq!(view.controls.options.len(), 3);
        assert_eq!(view.controls.options[1].label, "Lyon.");
        assert_eq!(view.squares[2].tokens, vec![PlayerId::One]);
        assert!(matches!(view.center, CenterDisplay::QuestionPrompt { .. }));
    }
}
