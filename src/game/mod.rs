//! Game core: board geometry, movement rules, dice and the turn engine.

pub mod types;
pub mod board;
pub mod dice;
pub mod movement;
pub mod engine;

pub use types::*;
pub use board::{Board, BoardError, Cell, SquareKind};
pub use dice::{Die, LoadedDie, RandomDie};
pub use movement::MoveCause;
pub use engine::{GameEvent, GameSnapshot, Rejection, Scheduled, Step, Timer, TurnEngine};
