//! Ports to the collaborators the rules consume but do not own.
//!
//! - [`DiceRoller`]: the only source of randomness, injected for reproducibility
//! - [`ActorStats`]: ability modifiers, proficiency and class membership
//! - [`InventoryQuery`]: "does this actor carry item X" for tool and key gates

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::value_objects::{Ability, DiceFormula, DiceRollResult, Size, Skill};

/// Uniform integer source.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait DiceRoller: Send + Sync {
    /// Uniformly distributed value in `[1, sides]`.
    fn roll_die(&self, sides: u32) -> i32;
}

/// Convenience rolls built on [`DiceRoller::roll_die`].
pub trait DiceRollerExt: DiceRoller {
    fn roll_d20(&self) -> i32 {
        self.roll_die(20)
    }

    fn roll_formula(&self, formula: &DiceFormula) -> DiceRollResult
    where
        Self: Sized,
    {
        formula.roll(self)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize {
        let sides = u32::try_from(len).unwrap_or(u32::MAX).max(1);
        let face = self.roll_die(sides).clamp(1, i32::try_from(sides).unwrap_or(i32::MAX));
        (face - 1) as usize
    }
}

impl<T: DiceRoller + ?Sized> DiceRollerExt for T {}

/// Something an actor can be trained in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Skill(Skill),
    ThievesTools,
}

/// The character stat provider.
pub trait ActorStats {
    fn ability_modifier(&self, ability: Ability) -> i32;

    fn proficiency_bonus(&self) -> i32;

    /// Case-insensitive class membership ("Rogue", "Wizard", ...).
    fn has_class(&self, class: &str) -> bool;

    fn is_proficient(&self, proficiency: Proficiency) -> bool;

    fn size(&self) -> Size;

    fn knows_language(&self, language: &str) -> bool;
}

/// Item possession checks.
pub trait InventoryQuery {
    fn has_item(&self, item: &ItemId) -> bool;
}

impl InventoryQuery for [ItemId] {
    fn has_item(&self, item: &ItemId) -> bool {
        self.contains(item)
    }
}

impl InventoryQuery for Vec<ItemId> {
    fn has_item(&self, item: &ItemId) -> bool {
        self.contains(item)
    }
}

impl InventoryQuery for HashSet<ItemId> {
    fn has_item(&self, item: &ItemId) -> bool {
        self.contains(item)
    }
}
