//! Interaction rules
//!
//! Each module resolves one kind of interaction: it reads the actor through
//! [`ActorStats`], rolls through the injected [`DiceRoller`](crate::ports::DiceRoller),
//! mutates only the record it was handed and returns a result record. Effects
//! on other records travel back as [`LinkUpdate`](crate::value_objects::LinkUpdate)s.

pub mod arcane_glyph;
pub mod cipher;
pub mod lock_trap;
pub mod mechanism;
pub mod pressure_plate;
pub mod puzzle;
pub mod secret_door;
pub mod skill_challenge;

use serde::{Deserialize, Serialize};

use crate::entities::{Trap, TrapKind};
use crate::ids::ItemId;
use crate::ports::{ActorStats, InventoryQuery, Proficiency};
use crate::value_objects::{Ability, Links, Skill, TriggeredTrap};

/// Outcome of searching for a hidden device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub success: bool,
    pub margin: i32,
    pub detected: bool,
    pub message: String,
}

/// Item ids accepted as thieves' tools.
pub const THIEVES_TOOLS_IDS: [&str; 3] = ["thieves-tools", "thieves_tools", "thieves' tools"];

/// Classes trained in magical theory.
pub const ARCANE_CLASSES: [&str; 6] = ["Wizard", "Sorcerer", "Warlock", "Bard", "Druid", "Cleric"];

pub(crate) fn has_thieves_tools(inventory: &(impl InventoryQuery + ?Sized)) -> bool {
    THIEVES_TOOLS_IDS
        .iter()
        .any(|id| inventory.has_item(&ItemId::new(*id)))
}

/// Tool proficiency, which every Rogue has.
pub(crate) fn proficient_with_tools(actor: &dyn ActorStats) -> bool {
    actor.is_proficient(Proficiency::ThievesTools) || actor.has_class("Rogue")
}

pub(crate) fn proficient_in_detection(actor: &dyn ActorStats) -> bool {
    actor.is_proficient(Proficiency::Skill(Skill::Perception))
        || actor.is_proficient(Proficiency::Skill(Skill::Investigation))
}

pub(crate) fn proficient_in_arcana(actor: &dyn ActorStats) -> bool {
    ARCANE_CLASSES.iter().any(|class| actor.has_class(class))
        || actor.is_proficient(Proficiency::Skill(Skill::Arcana))
}

/// Noticing hidden things: the better of Wis and Int, plus proficiency.
pub(crate) fn detection_modifier(actor: &dyn ActorStats) -> i32 {
    actor
        .ability_modifier(Ability::Wisdom)
        .max(actor.ability_modifier(Ability::Intelligence))
        + bonus_if(actor, proficient_in_detection(actor))
}

/// Exact, case-insensitive comparison of a typed answer. Whitespace counts.
pub(crate) fn answers_match(expected: &str, given: &str) -> bool {
    expected.to_lowercase() == given.to_lowercase()
}

/// The actor's proficiency bonus when `proficient`, otherwise zero.
pub(crate) fn bonus_if(actor: &dyn ActorStats, proficient: bool) -> i32 {
    if proficient {
        actor.proficiency_bonus()
    } else {
        0
    }
}

/// The effect of a device's linked trap, if the trap handed in is the
/// linked one and can still fire. The trap itself is left untouched.
pub(crate) fn linked_trap_effect(
    source: &str,
    links: &Links,
    linked_trap: Option<&Trap>,
) -> Option<TriggeredTrap> {
    let trap_id = links.trap_id.as_ref()?;
    let Some(trap) = linked_trap else {
        tracing::warn!(source, trap_id = %trap_id, "Linked trap not supplied");
        return None;
    };
    if trap.id != *trap_id {
        tracing::warn!(source, expected = %trap_id, supplied = %trap.id, "Supplied trap is not the linked one");
        return None;
    }
    if trap.kind != TrapKind::Mechanical {
        tracing::warn!(source, trap_id = %trap.id, "Devices only spring mechanical traps");
        return None;
    }
    if trap.is_resolved() {
        return None;
    }
    Some(TriggeredTrap {
        trap_id: trap.id.clone(),
        effect: trap.effect.clone(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::entities::Character;
    use crate::ports::MockDiceRoller;
    use crate::value_objects::Ability;

    /// A roller that returns the given d20 faces in order.
    pub fn scripted_d20(faces: &[i32]) -> MockDiceRoller {
        let mut dice = MockDiceRoller::new();
        let mut faces = faces.to_vec().into_iter();
        dice.expect_roll_die()
            .withf(|sides| *sides == 20)
            .times(faces.len())
            .returning(move |_| faces.next().unwrap_or(1));
        dice
    }

    /// A roller that must not be touched.
    pub fn no_dice() -> MockDiceRoller {
        let mut dice = MockDiceRoller::new();
        dice.expect_roll_die().never();
        dice
    }

    /// Level 1 character with every score at 10.
    pub fn commoner() -> Character {
        Character::new("Commoner", 1)
    }

    /// Level 1 Rogue, Dex 14: +2 Dex, +2 proficiency.
    pub fn rogue() -> Character {
        Character::new("Rogue", 1)
            .with_class("Rogue")
            .with_score(Ability::Dexterity, 14)
    }
}
