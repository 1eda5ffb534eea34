//! Game configuration constants.
//!
//! This module defines the board dimensions, the two fixed players, and the
//! wall-clock pacing of the three timed steps of a turn.

/// Number of columns in the board grid.
pub const BOARD_WIDTH: usize = 15;

/// Number of rows in the board grid.
pub const BOARD_HEIGHT: usize = 5;

/// Square every player starts on.
pub const START_SQUARE: usize = 1;

/// Faces on the die.
pub const DIE_FACES: u8 = 6;

/// Display names and token colors, indexed by player slot.
pub const PLAYER_NAMES: [&str; 2] = ["Player 1", "Player 2"];
pub const PLAYER_COLORS: [&str; 2] = ["blue", "red"];

/// Delay (ms) between the dice roll and the token moving.
pub const DICE_ANIMATION_MS: u64 = 700;

/// Delay (ms) the consequence text stays up before the token moves.
pub const CONSEQUENCE_REVEAL_MS: u64 = 2500;

/// Delay (ms) between the consequence move and the next player's turn.
pub const TURN_HANDOFF_MS: u64 = 800;
