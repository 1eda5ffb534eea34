use std::collections::VecDeque;

use rand::Rng;

use crate::config::game::DIE_FACES;

/// Source of die values in `1..=DIE_FACES`.
pub trait Die {
    fn roll(&mut self) -> u8;
}

/// Fair die backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDie;

impl Die for RandomDie {
    fn roll(&mut self) -> u8 {
        rand::rng().random_range(1..=DIE_FACES)
    }
}

/// Die that replays a fixed sequence, then repeats its last value.
#[derive(Debug, Clone)]
pub struct LoadedDie {
    faces: VecDeque<u8>,
    last: u8,
}

impl LoadedDie {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self { faces: faces.into_iter().collect(), last: 1 }
    }
}

impl Die for LoadedDie {
    fn roll(&mut self) -> u8 {
        if let Some(face) = self.faces.pop_front() {
            self.last = face.clamp(1, DIE_FACES);
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_die_stays_in_range() {
        let mut die = RandomDie;
        for _ in 0..500 {
            let face = die.roll();
            assert!((1..=DIE_FACES).contains(&face));
        }
    }

    #[test]
    fn test_loaded_die_replays_then_repeats() {
        let mut die = LoadedDie::new([4, 2]);
        assert_eq!(die.roll(), 4);
        assert_eq!(die.roll(), 2);
        assert_eq!(die.roll(), 2);
    }
}
