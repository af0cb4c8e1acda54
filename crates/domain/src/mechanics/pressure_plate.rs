//! Weight-triggered plates.

use serde::{Deserialize, Serialize};

use super::{
    bonus_if, detection_modifier, linked_trap_effect, proficient_with_tools, DetectionResult,
};
use crate::check::{roll_check, slips};
use crate::entities::{PressurePlate, ResetBehavior, Trap};
use crate::ports::{ActorStats, DiceRoller};
use crate::value_objects::{Ability, LinkUpdate, LockAction, TriggeredTrap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressurePlateResult {
    pub triggered: bool,
    pub triggered_trap: Option<TriggeredTrap>,
    pub link_updates: Vec<LinkUpdate>,
    pub message: String,
}

impl PressurePlateResult {
    fn inert(message: impl Into<String>) -> Self {
        Self {
            triggered: false,
            triggered_trap: None,
            link_updates: Vec::new(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressurePlateJamResult {
    pub success: bool,
    pub margin: i32,
    /// The plate went down anyway
    pub triggered: bool,
    pub triggered_trap: Option<TriggeredTrap>,
    pub link_updates: Vec<LinkUpdate>,
    pub message: String,
}

/// Press the plate and gather what its links set in motion.
fn press(plate: &mut PressurePlate, linked_trap: Option<&Trap>) -> (Option<TriggeredTrap>, Vec<LinkUpdate>) {
    plate.is_pressed = true;
    tracing::info!(plate_id = %plate.id, "Pressure plate pressed");

    let mut updates = Vec::new();
    let triggered_trap = linked_trap_effect("pressure_plate", &plate.links, linked_trap);
    if let Some(triggered) = &triggered_trap {
        updates.push(LinkUpdate::TrapTriggered {
            trap_id: triggered.trap_id.clone(),
            effect: triggered.effect.clone(),
        });
    }
    if let Some(link) = &plate.links.puzzle {
        updates.push(LinkUpdate::PuzzleSignal {
            puzzle_id: link.puzzle_id.clone(),
            signal: link.signal.clone(),
        });
    }
    if let Some(lock_id) = &plate.links.lock_id {
        updates.push(LinkUpdate::LockToggle {
            lock_id: lock_id.clone(),
            action: LockAction::Toggle,
        });
    }

    if plate.reset_behavior == ResetBehavior::AutoInstant {
        plate.is_pressed = false;
    }

    (triggered_trap, updates)
}

/// Step onto a plate. Jammed plates and actors below the size threshold
/// never set it off.
pub fn check_pressure_plate(
    actor: &dyn ActorStats,
    plate: &mut PressurePlate,
    linked_trap: Option<&Trap>,
) -> PressurePlateResult {
    if plate.is_jammed {
        return PressurePlateResult::inert("The plate is jammed and does not move.");
    }
    if plate.is_pressed {
        return PressurePlateResult::inert("The plate is already pressed down.");
    }
    if actor.size() < plate.min_size {
        tracing::debug!(plate_id = %plate.id, size = ?actor.size(), min_size = ?plate.min_size, "Too light to press plate");
        return PressurePlateResult::inert("The plate does not budge under your weight.");
    }

    let (triggered_trap, link_updates) = press(plate, linked_trap);
    PressurePlateResult {
        triggered: true,
        message: if triggered_trap.is_some() {
            "Click. The plate sinks and a trap springs!".to_string()
        } else {
            "Click. The plate sinks beneath you.".to_string()
        },
        triggered_trap,
        link_updates,
    }
}

/// Spot a hidden plate and reveal it.
pub fn detect_pressure_plate(
    actor: &dyn ActorStats,
    plate: &mut PressurePlate,
    dice: &dyn DiceRoller,
) -> DetectionResult {
    if !plate.is_hidden {
        return DetectionResult {
            success: true,
            margin: 0,
            detected: true,
            message: "The plate is in plain sight.".to_string(),
        };
    }

    let check = roll_check(dice, detection_modifier(actor), plate.detection_dc);
    if check.success {
        plate.is_hidden = false;
        tracing::info!(plate_id = %plate.id, "Pressure plate revealed");
    }

    DetectionResult {
        success: check.success,
        margin: check.margin,
        detected: check.success,
        message: if check.success {
            "You notice a slightly raised flagstone.".to_string()
        } else {
            "The floor looks ordinary.".to_string()
        },
    }
}

/// Wedge a plate so it cannot be pressed. Missing by five or more presses it.
pub fn jam_pressure_plate(
    actor: &dyn ActorStats,
    plate: &mut PressurePlate,
    linked_trap: Option<&Trap>,
    dice: &dyn DiceRoller,
) -> PressurePlateJamResult {
    if plate.is_jammed {
        return PressurePlateJamResult {
            success: true,
            margin: 0,
            triggered: false,
            triggered_trap: None,
            link_updates: Vec::new(),
            message: "The plate is already jammed.".to_string(),
        };
    }

    let modifier = actor.ability_modifier(Ability::Dexterity)
        + bonus_if(actor, proficient_with_tools(actor));
    let check = roll_check(dice, modifier, plate.jam_dc);

    if check.success {
        plate.is_jammed = true;
        tracing::info!(plate_id = %plate.id, "Pressure plate jammed");
        return PressurePlateJamResult {
            success: true,
            margin: check.margin,
            triggered: false,
            triggered_trap: None,
            link_updates: Vec::new(),
            message: "You wedge the plate in place.".to_string(),
        };
    }

    if slips(check.margin) && !plate.is_pressed {
        tracing::info!(plate_id = %plate.id, margin = check.margin, "Jam attempt slipped");
        let (triggered_trap, link_updates) = press(plate, linked_trap);
        return PressurePlateJamResult {
            success: false,
            margin: check.margin,
            triggered: true,
            triggered_trap,
            link_updates,
            message: "Your hand slips and the plate clicks down!".to_string(),
        };
    }

    PressurePlateJamResult {
        success: false,
        margin: check.margin,
        triggered: false,
        triggered_trap: None,
        link_updates: Vec::new(),
        message: "You fail to find purchase for a wedge.".to_string(),
    }
}

/// Let a pressed plate rise again. Returns whether it was pressed.
pub fn release_pressure_plate(plate: &mut PressurePlate) -> bool {
    let was_pressed = plate.is_pressed;
    plate.is_pressed = false;
    was_pressed
}
