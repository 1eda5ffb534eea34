//! Standalone entry point for playing a game locally in the terminal.
//!
//! Usage: `standalone <deck.json> [topic] [level] [structure]`
//!
//! The deck file uses the same JSON format the question source returns.
//! Press Enter to roll, 1-3 to answer, `r` to reset and `q` to quit.

use std::error::Error;
use std::io::{self, Write};

use log::info;

use esl_board::config::game::{BOARD_HEIGHT, BOARD_WIDTH};
use esl_board::game::board::Board;
use esl_board::game::dice::RandomDie;
use esl_board::game::engine::{Rejection, Step, TurnEngine};
use esl_board::game::types::{GamePhase, GameSettings, Level};
use esl_board::presentation::{delay_for, render_board, BoardView};
use esl_board::question_source::parse_deck;

enum Input {
    Roll,
    Pick(usize),
    Reset,
    Quit,
    Unknown,
}

/// Prompt the user for the next action.
fn read_input(prompt: &str) -> io::Result<Input> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    Ok(match line.trim() {
        "" => Input::Roll,
        "q" | "Q" => Input::Quit,
        "r" | "R" => Input::Reset,
        digit => match digit.parse::<usize>() {
            Ok(n @ 1..=3) => Input::Pick(n - 1),
            _ => Input::Unknown,
        },
    })
}

fn draw(engine: &TurnEngine) {
    println!("{}", render_board(&BoardView::from_engine(engine)));
}

/// Run timers until the engine stops asking for one, redrawing after each.
async fn drive(engine: &mut TurnEngine, outcome: Result<Step, Rejection>) {
    let mut next = outcome.ok().and_then(|step| step.next);
    while let Some(scheduled) = next {
        draw(engine);
        tokio::time::sleep(delay_for(scheduled.timer)).await;
        next = engine.fire(scheduled).ok().and_then(|step| step.next);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: standalone <deck.json> [topic] [level] [structure]");
        std::process::exit(2);
    };
    let deck = parse_deck(&std::fs::read_to_string(&path)?)?;
    let settings = GameSettings {
        topic: args.next().unwrap_or_else(|| "Free practice".to_string()),
        level: match args.next() {
            Some(level) => level.parse::<Level>()?,
            None => Level::A1,
        },
        structure: args.next().unwrap_or_else(|| "Mixed".to_string()),
    };
    info!("[Standalone] Loaded {} questions from {}", deck.len(), path);

    let mut engine = TurnEngine::new(Board::new(BOARD_WIDTH, BOARD_HEIGHT)?);
    let mut die = RandomDie;
    engine.start_game(deck.clone(), settings.clone())?;

    loop {
        draw(&engine);
        let prompt = match engine.phase() {
            GamePhase::Questioning => "Pick an answer (1-3), r to reset, q to quit: ",
            GamePhase::Setup => "Press Enter to start a new game, q to quit: ",
            _ => "Press Enter to roll, r to reset, q to quit: ",
        };
        let outcome = match read_input(prompt)? {
            Input::Quit => break,
            Input::Reset => Ok(engine.reset()),
            Input::Roll if engine.phase() == GamePhase::Setup => {
                engine.start_game(deck.clone(), settings.clone())
            }
            Input::Roll => engine.roll_dice(&mut die),
            Input::Pick(slot) => {
                let index = engine.cursor().question_index;
                match engine.option_at(index, slot).cloned() {
                    Some(option) => engine.select_option(&option),
                    None => continue,
                }
            }
            Input::Unknown => continue,
        };
        drive(&mut engine, outcome).await;
    }

    println!("Bye!");
    Ok(())
}
