//! Token movement policies.
//!
//! Dice moves wrap past the last square back to square 1; consequence moves
//! are clamped to the ends of the track. Both keep positions in `1..=total`.

use serde::{Deserialize, Serialize};

/// What moved a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCause {
    Dice,
    Consequence,
}

/// Move forward `steps` squares, wrapping around the track.
pub fn advance_wrapping(position: usize, steps: usize, total: usize) -> usize {
    (position + steps - 1) % total + 1
}

/// Shift by `delta` squares, stopping at square 1 or square `total`.
pub fn shift_clamped(position: usize, delta: i32, total: usize) -> usize {
    let target = position as i64 + i64::from(delta);
    target.clamp(1, total as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_move_wraps_past_the_end() {
        assert_eq!(advance_wrapping(35, 3, 36), 2);
        assert_eq!(advance_wrapping(30, 6, 36), 36);
        assert_eq!(advance_wrapping(36, 1, 36), 1);
        assert_eq!(advance_wrapping(1, 4, 36), 5);
    }

    #[test]
    fn test_consequence_move_clamps_at_both_ends() {
        assert_eq!(shift_clamped(1, -2, 36), 1);
        assert_eq!(shift_clamped(2, -2, 36), 1);
        assert_eq!(shift_clamped(35, 2, 36), 36);
        assert_eq!(shift_clamped(10, 0, 36), 10);
        assert_eq!(shift_clamped(5, -1, 36), 4);
    }

    #[test]
    fn test_large_deltas_stay_on_the_board() {
        assert_eq!(shift_clamped(3, i32::MIN, 36), 1);
        assert_eq!(shift_clamped(3, i32::MAX, 36), 36);
    }
}
