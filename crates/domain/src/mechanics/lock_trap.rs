//! Lockpicking, breaking, and mechanical trap detection and disarming.

use serde::{Deserialize, Serialize};

use super::{bonus_if, detection_modifier, has_thieves_tools, proficient_with_tools};
use crate::check::{roll_check, triggers_trap, CheckRoll, MISSING_TOOLS_MARGIN, WRONG_TRAP_KIND_MARGIN};
use crate::entities::{Lock, Trap, TrapKind};
use crate::ports::{ActorStats, DiceRoller, InventoryQuery};
use crate::value_objects::{Ability, TriggeredTrap};

/// Break DC for locks that only define hit points.
pub const DEFAULT_BREAK_DC: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockpickResult {
    pub success: bool,
    pub margin: i32,
    pub check: Option<CheckRoll>,
    pub triggered_trap: Option<TriggeredTrap>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakResult {
    pub success: bool,
    pub margin: i32,
    pub check: Option<CheckRoll>,
    /// Hit points knocked off the lock when it gives way
    pub damage_dealt: Option<i32>,
    pub is_broken: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapDetectionResult {
    pub success: bool,
    pub margin: i32,
    pub trap_detected: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapDisarmResult {
    pub success: bool,
    pub margin: i32,
    pub triggered_trap: Option<TriggeredTrap>,
    pub message: String,
}

impl TrapDisarmResult {
    pub(crate) fn wrong_kind(trap: &Trap, expected: TrapKind) -> Self {
        tracing::warn!(
            trap_id = %trap.id,
            kind = ?trap.kind,
            expected = ?expected,
            "Trap handed to the wrong module, refusing"
        );
        Self {
            success: false,
            margin: WRONG_TRAP_KIND_MARGIN,
            triggered_trap: None,
            message: format!("{} cannot be handled that way.", trap.name),
        }
    }
}

/// Open a lock with its key, without a roll. Returns whether the lock opened.
pub fn unlock_with_key(lock: &mut Lock, inventory: &(impl InventoryQuery + ?Sized)) -> bool {
    let Some(key_id) = &lock.key_id else {
        return false;
    };
    if !inventory.has_item(key_id) {
        return false;
    }
    if lock.is_locked {
        lock.is_locked = false;
        tracing::info!(lock_id = %lock.id, key_id = %key_id, "Lock opened with key");
    }
    true
}

/// Pick a lock with thieves' tools: d20 + Dex (+ proficiency) vs the lock DC.
///
/// A trap wired into the lock fires only when the attempt misses by more
/// than five.
pub fn attempt_lockpick(
    actor: &dyn ActorStats,
    lock: &mut Lock,
    inventory: &(impl InventoryQuery + ?Sized),
    dice: &dyn DiceRoller,
) -> LockpickResult {
    if !lock.is_barring() {
        return LockpickResult {
            success: true,
            margin: 0,
            check: None,
            triggered_trap: None,
            message: "It is already unlocked.".to_string(),
        };
    }

    if !has_thieves_tools(inventory) {
        return LockpickResult {
            success: false,
            margin: MISSING_TOOLS_MARGIN,
            check: None,
            triggered_trap: None,
            message: "You need thieves' tools to pick this lock.".to_string(),
        };
    }

    let modifier = actor.ability_modifier(Ability::Dexterity)
        + bonus_if(actor, proficient_with_tools(actor));
    let check = roll_check(dice, modifier, lock.dc);

    if check.success {
        lock.is_locked = false;
        tracing::info!(lock_id = %lock.id, margin = check.margin, "Lock picked");
        return LockpickResult {
            success: true,
            margin: check.margin,
            check: Some(check),
            triggered_trap: None,
            message: "The lock clicks open.".to_string(),
        };
    }

    let lock_id = lock.id.clone();
    let triggered_trap = if triggers_trap(check.margin) {
        lock.trap.as_mut().and_then(|trap| {
            if trap.kind != TrapKind::Mechanical {
                tracing::warn!(lock_id = %lock_id, trap_id = %trap.id, "Ignoring magical trap on lock");
                return None;
            }
            trap.trigger().map(|effect| TriggeredTrap {
                trap_id: trap.id.clone(),
                effect,
            })
        })
    } else {
        None
    };

    let message = if triggered_trap.is_some() {
        "Your pick slips and something inside the lock snaps!"
    } else {
        "The lock resists your efforts."
    };

    LockpickResult {
        success: false,
        margin: check.margin,
        check: Some(check),
        triggered_trap,
        message: message.to_string(),
    }
}

/// Force a lock with a Strength check. No tools needed.
pub fn attempt_break(actor: &dyn ActorStats, lock: &mut Lock, dice: &dyn DiceRoller) -> BreakResult {
    if !lock.is_breakable() {
        return BreakResult {
            success: false,
            margin: 0,
            check: None,
            damage_dealt: None,
            is_broken: lock.is_broken,
            message: "This lock cannot be broken by force.".to_string(),
        };
    }

    if lock.is_broken {
        return BreakResult {
            success: true,
            margin: 0,
            check: None,
            damage_dealt: None,
            is_broken: true,
            message: "The lock is already broken.".to_string(),
        };
    }

    let dc = lock.break_dc.unwrap_or(DEFAULT_BREAK_DC);
    let check = roll_check(dice, actor.ability_modifier(Ability::Strength), dc);

    if !check.success {
        return BreakResult {
            success: false,
            margin: check.margin,
            check: Some(check),
            damage_dealt: None,
            is_broken: false,
            message: "The lock holds.".to_string(),
        };
    }

    let damage_dealt = lock.current_hp.or(lock.break_hp);
    if lock.current_hp.is_some() || lock.break_hp.is_some() {
        lock.current_hp = Some(0);
    }
    lock.is_broken = true;
    tracing::info!(lock_id = %lock.id, margin = check.margin, "Lock broken");

    BreakResult {
        success: true,
        margin: check.margin,
        check: Some(check),
        damage_dealt,
        is_broken: true,
        message: "The lock shatters.".to_string(),
    }
}

/// Spot a trap: d20 + the better of Wis and Int (+ proficiency) vs its detection DC.
pub fn detect_trap(actor: &dyn ActorStats, trap: &Trap, dice: &dyn DiceRoller) -> TrapDetectionResult {
    if trap.is_resolved() {
        return TrapDetectionResult {
            success: true,
            margin: 0,
            trap_detected: true,
            message: format!("The {} is plainly visible.", trap.name),
        };
    }

    if trap.kind != TrapKind::Mechanical {
        tracing::warn!(trap_id = %trap.id, "Magical trap handed to mundane detection, refusing");
        return TrapDetectionResult {
            success: false,
            margin: WRONG_TRAP_KIND_MARGIN,
            trap_detected: false,
            message: "You find nothing mechanical here.".to_string(),
        };
    }

    let check = roll_check(dice, detection_modifier(actor), trap.detection_dc);

    if check.success {
        tracing::info!(trap_id = %trap.id, "Trap detected");
    }

    TrapDetectionResult {
        success: check.success,
        margin: check.margin,
        trap_detected: check.success,
        message: if check.success {
            format!("You spot a {}.", trap.name)
        } else {
            "You find nothing unusual.".to_string()
        },
    }
}

/// Disarm a mechanical trap with thieves' tools.
pub fn disarm_trap(
    actor: &dyn ActorStats,
    trap: &mut Trap,
    inventory: &(impl InventoryQuery + ?Sized),
    dice: &dyn DiceRoller,
) -> TrapDisarmResult {
    if trap.is_disarmed {
        return TrapDisarmResult {
            success: true,
            margin: 0,
            triggered_trap: None,
            message: "The trap is already disarmed.".to_string(),
        };
    }

    if trap.kind != TrapKind::Mechanical {
        return TrapDisarmResult::wrong_kind(trap, TrapKind::Mechanical);
    }

    if !has_thieves_tools(inventory) {
        return TrapDisarmResult {
            success: false,
            margin: MISSING_TOOLS_MARGIN,
            triggered_trap: None,
            message: "You need thieves' tools to disarm this trap.".to_string(),
        };
    }

    let modifier = actor.ability_modifier(Ability::Dexterity)
        + bonus_if(actor, proficient_with_tools(actor));
    let check = roll_check(dice, modifier, trap.disarm_dc);

    resolve_disarm(trap, check, "You carefully disable the mechanism.")
}

/// Shared tail of mundane and arcane disarming.
pub(crate) fn resolve_disarm(trap: &mut Trap, check: CheckRoll, success_message: &str) -> TrapDisarmResult {
    if check.success {
        trap.is_disarmed = true;
        tracing::info!(trap_id = %trap.id, margin = check.margin, "Trap disarmed");
        return TrapDisarmResult {
            success: true,
            margin: check.margin,
            triggered_trap: None,
            message: success_message.to_string(),
        };
    }

    let triggered_trap = if triggers_trap(check.margin) {
        trap.trigger().map(|effect| TriggeredTrap {
            trap_id: trap.id.clone(),
            effect,
        })
    } else {
        None
    };

    TrapDisarmResult {
        success: false,
        margin: check.margin,
        message: if triggered_trap.is_some() {
            format!("You set off the {}!", trap.name)
        } else {
            "You fail to disarm it, but nothing happens.".to_string()
        },
        triggered_trap,
    }
}
