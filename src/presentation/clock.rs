//! Wall-clock pacing for engine timers.

use std::time::Duration;

use crate::config::game::{CONSEQUENCE_REVEAL_MS, DICE_ANIMATION_MS, TURN_HANDOFF_MS};
use crate::game::engine::Timer;

/// How long the presentation waits before handing a timer back to the engine.
pub fn delay_for(timer: Timer) -> Duration {
    let millis = match timer {
        Timer::DiceSettled => DICE_ANIMATION_MS,
        Timer::ConsequenceReveal => CONSEQUENCE_REVEAL_MS,
        Timer::TurnHandoff => TURN_HANDOFF_MS,
    };
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_is_shorter_than_reveal() {
        assert!(delay_for(Timer::TurnHandoff) < delay_for(Timer::ConsequenceReveal));
        assert_eq!(delay_for(Timer::DiceSettled), Duration::from_millis(700));
    }
}
