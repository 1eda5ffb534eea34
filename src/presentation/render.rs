//! Text rendering (terminal).
//!
//! Draws the perimeter board with player tokens, then the centre panel,
//! player panels and controls underneath.

use std::fmt::Write;

use crate::game::board::SquareKind;
use crate::game::types::{CenterDisplay, PlayerId};
use super::view::BoardView;

const CELL_WIDTH: usize = 5;

fn square_label(index: usize, kind: SquareKind, tokens: &[PlayerId]) -> String {
    if !tokens.is_empty() {
        let ids: String = tokens.iter().map(|id| id.to_string()).collect();
        return format!("P{ids}");
    }
    match kind {
        SquareKind::Go => "GO".to_string(),
        SquareKind::Corner => format!("{index}+"),
        SquareKind::Plain => index.to_string(),
    }
}

/// Render a board view as plain text.
pub fn render_board(view: &BoardView) -> String {
    let mut grid = vec![vec![String::new(); view.width]; view.height];
    for square in &view.squares {
        let label = square_label(square.index, square.kind, &square.tokens);
        grid[square.cell.row][square.cell.col] = label;
    }

    let mut out = String::new();
    if let Some(settings) = &view.settings {
        let _ = writeln!(
            out,
            "Topic: {} | Level: {} | Focus: {}",
            settings.topic, settings.level, settings.structure
        );
    }
    for row in &grid {
        let line: String = row.iter().map(|label| format!("{label:<CELL_WIDTH$}")).collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out.push('\n');

    match &view.center {
        CenterDisplay::Placeholder { text } => {
            let _ = writeln!(out, "{text}");
        }
        CenterDisplay::QuestionPrompt { question, player_name } => {
            let _ = writeln!(out, "{player_name}'s Question:");
            let _ = writeln!(out, "  {}", question.prompt);
            for (slot, option) in question.options.iter().enumerate() {
                let _ = writeln!(out, "  [{}] {}", slot + 1, option.label);
            }
        }
        CenterDisplay::Consequence(consequence) => {
            let action = match consequence.move_delta {
                d if d > 0 => format!("Move +{d}"),
                d if d < 0 => format!("Move {d}"),
                _ => "Stay put".to_string(),
            };
            let _ = writeln!(
                out,
                "{} chose: \"{}\"",
                consequence.player_name, consequence.chosen_label
            );
            let _ = writeln!(out, "  {}", consequence.text);
            let _ = writeln!(out, "  Action: {action}");
        }
    }
    out.push('\n');

    for player in &view.players {
        let marker = if player.active { ">" } else { " " };
        let dice = player.dice.map_or("?".to_string(), |d| d.to_string());
        let _ = writeln!(
            out,
            "{marker} {} ({}) - Square {} - Dice: {dice}",
            player.name, player.color, player.position
        );
    }
    let _ = writeln!(out, "{}  {}", view.controls.dice_face, view.controls.roll_label);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;
    use crate::game::dice::LoadedDie;
    use crate::game::engine::TurnEngine;
    use crate::game::types::{Deck, GameSettings, Level, Question, QuestionOption};

    fn engine() -> TurnEngine {
        let option = |label: &str, delta| QuestionOption {
            label: label.to_string(),
            consequence: format!("You said {label}"),
            move_delta: delta,
        };
        let deck = Deck::new(vec![Question {
            prompt: "Can you swim?".to_string(),
            options: [option("Yes, I can.", 2), option("Yes, I swim can.", -1), option("Yes.", 0)],
        }])
        .unwrap();
        let mut engine = TurnEngine::new(Board::new(15, 5).unwrap());
        engine
            .start_game(
                deck,
                GameSettings { topic: "Sports".into(), level: Level::A1, structure: "can".into() },
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_board_has_one_line_per_row() {
        let text = render_board(&BoardView::from_engine(&engine()));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Topic: Sports"));
        assert!(lines[1].starts_with("P12"));
        assert!(lines[1].contains("15+"));
        assert!(lines[5].starts_with("33+"));
        assert!(text.contains("Prepare for your turn!"));
        assert!(text.contains("Player 1, Roll Dice!"));
    }

    #[test]
    fn test_question_and_consequence_panels() {
        let mut engine = engine();
        let step = engine.roll_dice(&mut LoadedDie::new([3])).unwrap();
        engine.fire(step.next.unwrap()).unwrap();
        let text = render_board(&BoardView::from_engine(&engine));
        assert!(text.contains("Player 1's Question:"));
        assert!(text.contains("[2] Yes, I swim can."));

        let wrong = engine.current_question().unwrap().options[1].clone();
        engine.select_option(&wrong).unwrap();
        let text = render_board(&BoardView::from_engine(&engine));
        assert!(text.contains("Player 1 chose: \"Yes, I swim can.\""));
        assert!(text.contains("Action: Move -1"));
    }
}
