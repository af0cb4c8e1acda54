//! Value objects for the interaction domain

mod abilities;
mod dice;
mod link;

pub use abilities::{Ability, AbilityScores, Size, Skill};
pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use link::{LinkUpdate, Links, LockAction, PuzzleLink, TriggeredTrap};
