//! Dice roller implementations.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use delve_domain::DiceRoller;

/// System dice - uses real randomness.
pub struct SystemDice;

impl SystemDice {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller for SystemDice {
    fn roll_die(&self, sides: u32) -> i32 {
        let sides = i32::try_from(sides.max(1)).unwrap_or(i32::MAX);
        rand::thread_rng().gen_range(1..=sides)
    }
}

/// Seeded dice - the same seed replays the same sequence of rolls.
pub struct SeededDice {
    rng: Mutex<StdRng>,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll_die(&self, sides: u32) -> i32 {
        let sides = i32::try_from(sides.max(1)).unwrap_or(i32::MAX);
        // A poisoned lock still holds a usable generator.
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(1..=sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_dice_stay_in_range() {
        let dice = SystemDice::new();
        for _ in 0..200 {
            let face = dice.roll_die(6);
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn same_seed_same_rolls() {
        let a = SeededDice::new(42);
        let b = SeededDice::new(42);
        let left: Vec<i32> = (0..50).map(|_| a.roll_die(20)).collect();
        let right: Vec<i32> = (0..50).map(|_| b.roll_die(20)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|face| (1..=20).contains(face)));
    }

    #[test]
    fn zero_sided_die_rolls_one() {
        assert_eq!(SeededDice::new(7).roll_die(0), 1);
    }
}
