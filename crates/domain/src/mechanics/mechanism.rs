//! Levers, wheels, buttons and the like.
//!
//! Interacting runs the gates in order: hidden, locked, stuck, then the
//! toggle. Any gate can stop the interaction short.

use serde::{Deserialize, Serialize};

use super::{
    bonus_if, detection_modifier, has_thieves_tools, linked_trap_effect, proficient_with_tools,
    DetectionResult,
};
use crate::check::{roll_check, CheckRoll};
use crate::entities::{Mechanism, NoiseLevel, Trap};
use crate::ids::ItemId;
use crate::ports::{ActorStats, DiceRoller, InventoryQuery};
use crate::value_objects::{Ability, LinkUpdate, LockAction, TriggeredTrap};

/// DC to pick a locked mechanism with tools.
pub const MECHANISM_PICK_DC: i32 = 15;

/// Raw d20 needed to force a locked mechanism without tools.
pub const FORCE_THRESHOLD: i32 = 20;

/// Default DC to free a stuck mechanism.
pub const DEFAULT_STUCK_DC: i32 = 15;

/// Consumables that help free a stuck mechanism, and their bonus.
pub const STUCK_AIDS: [&str; 2] = ["oil-flask", "grease-pot"];
const STUCK_AID_BONUS: i32 = 2;

/// The state whose entry springs a linked trap and unlocks a linked lock.
const ON_STATE: &str = "on";

/// Where the interaction stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MechanismOutcome {
    Hidden,
    /// Still locked after key, tools and force were tried
    LockHolds,
    /// Forced open, but the force jammed it
    ForcedButJammed,
    StillStuck,
    Toggled { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanismResult {
    pub success: bool,
    pub outcome: MechanismOutcome,
    /// The last check rolled on the way through
    pub check: Option<CheckRoll>,
    /// Aid spent on a stuck mechanism; the caller removes it from inventory
    pub consumed_item: Option<ItemId>,
    /// How loud the mechanism was when it moved
    pub noise_level: Option<NoiseLevel>,
    pub triggered_trap: Option<TriggeredTrap>,
    pub link_updates: Vec<LinkUpdate>,
    pub message: String,
}

impl MechanismResult {
    fn stopped(outcome: MechanismOutcome, check: Option<CheckRoll>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome,
            check,
            consumed_item: None,
            noise_level: None,
            triggered_trap: None,
            link_updates: Vec::new(),
            message: message.into(),
        }
    }
}

enum LockGate {
    Open(Option<CheckRoll>),
    Stop(MechanismResult),
}

fn pass_lock(
    actor: &dyn ActorStats,
    mechanism: &mut Mechanism,
    inventory: &(impl InventoryQuery + ?Sized),
    dice: &dyn DiceRoller,
) -> LockGate {
    if !mechanism.is_locked {
        return LockGate::Open(None);
    }

    if mechanism
        .key_id
        .as_ref()
        .is_some_and(|key| inventory.has_item(key))
    {
        mechanism.is_locked = false;
        tracing::info!(mechanism_id = %mechanism.id, "Mechanism unlocked with key");
        return LockGate::Open(None);
    }

    if has_thieves_tools(inventory) {
        let modifier = actor.ability_modifier(Ability::Dexterity)
            + bonus_if(actor, proficient_with_tools(actor));
        let check = roll_check(dice, modifier, MECHANISM_PICK_DC);
        if check.success {
            mechanism.is_locked = false;
            tracing::info!(mechanism_id = %mechanism.id, "Mechanism lock picked");
            return LockGate::Open(Some(check));
        }
        return LockGate::Stop(MechanismResult::stopped(
            MechanismOutcome::LockHolds,
            Some(check),
            "The lock on the mechanism resists your picks.",
        ));
    }

    // Flat threshold: neither Strength nor the lock's difficulty matter.
    let check = roll_check(dice, 0, FORCE_THRESHOLD);
    if check.success {
        mechanism.is_locked = false;
        mechanism.is_stuck = true;
        tracing::info!(mechanism_id = %mechanism.id, "Mechanism forced and jammed");
        return LockGate::Stop(MechanismResult::stopped(
            MechanismOutcome::ForcedButJammed,
            Some(check),
            "You wrench the lock apart, but the mechanism seizes up.",
        ));
    }
    LockGate::Stop(MechanismResult::stopped(
        MechanismOutcome::LockHolds,
        Some(check),
        "The mechanism is locked fast.",
    ))
}

/// Operate a mechanism, advancing it one position when every gate passes.
pub fn interact_with_mechanism(
    actor: &dyn ActorStats,
    mechanism: &mut Mechanism,
    inventory: &(impl InventoryQuery + ?Sized),
    linked_trap: Option<&Trap>,
    dice: &dyn DiceRoller,
) -> MechanismResult {
    if mechanism.is_hidden {
        return MechanismResult::stopped(
            MechanismOutcome::Hidden,
            None,
            "You run your hands over the wall but find nothing to operate.",
        );
    }

    let mut last_check = match pass_lock(actor, mechanism, inventory, dice) {
        LockGate::Open(check) => check,
        LockGate::Stop(result) => return result,
    };

    let mut consumed_item = None;
    if mechanism.is_stuck {
        let aid = STUCK_AIDS
            .iter()
            .map(|id| ItemId::new(*id))
            .find(|id| inventory.has_item(id));
        let aid_bonus = if aid.is_some() { STUCK_AID_BONUS } else { 0 };
        let dc = mechanism.stuck_dc.unwrap_or(DEFAULT_STUCK_DC);
        let check = roll_check(dice, actor.ability_modifier(Ability::Strength) + aid_bonus, dc);
        consumed_item = aid;

        if !check.success {
            let mut result = MechanismResult::stopped(
                MechanismOutcome::StillStuck,
                Some(check),
                "It will not budge.",
            );
            result.consumed_item = consumed_item;
            return result;
        }
        mechanism.is_stuck = false;
        tracing::info!(mechanism_id = %mechanism.id, "Mechanism freed");
        last_check = Some(check);
    }

    let from = mechanism.current_state().to_string();
    let to = mechanism.advance().to_string();
    let entering_on = to.eq_ignore_ascii_case(ON_STATE);
    tracing::info!(mechanism_id = %mechanism.id, from = %from, to = %to, "Mechanism toggled");

    let mut link_updates = Vec::new();
    let triggered_trap = if entering_on {
        linked_trap_effect("mechanism", &mechanism.links, linked_trap)
    } else {
        None
    };
    if let Some(triggered) = &triggered_trap {
        link_updates.push(LinkUpdate::TrapTriggered {
            trap_id: triggered.trap_id.clone(),
            effect: triggered.effect.clone(),
        });
    }
    if let Some(lock_id) = &mechanism.links.lock_id {
        link_updates.push(LinkUpdate::LockToggle {
            lock_id: lock_id.clone(),
            action: if entering_on {
                LockAction::Unlock
            } else {
                LockAction::Lock
            },
        });
    }
    if let Some(link) = &mechanism.links.puzzle {
        link_updates.push(LinkUpdate::PuzzleSignal {
            puzzle_id: link.puzzle_id.clone(),
            signal: format!("{}:{}", link.signal, to),
        });
    }

    MechanismResult {
        success: true,
        message: format!("The {} moves from {} to {}.", mechanism.name, from, to),
        outcome: MechanismOutcome::Toggled { from, to },
        check: last_check,
        consumed_item,
        noise_level: mechanism.noise_level,
        triggered_trap,
        link_updates,
    }
}

/// Search for a hidden mechanism and reveal it.
pub fn detect_mechanism(
    actor: &dyn ActorStats,
    mechanism: &mut Mechanism,
    dice: &dyn DiceRoller,
) -> DetectionResult {
    if !mechanism.is_hidden {
        return DetectionResult {
            success: true,
            margin: 0,
            detected: true,
            message: format!("The {} is in plain view.", mechanism.name),
        };
    }

    let check = roll_check(dice, detection_modifier(actor), mechanism.detection_dc);
    if check.success {
        mechanism.is_hidden = false;
        tracing::info!(mechanism_id = %mechanism.id, "Mechanism revealed");
    }

    DetectionResult {
        success: check.success,
        margin: check.margin,
        detected: check.success,
        message: if check.success {
            format!("You find a concealed {}.", mechanism.name)
        } else {
            "You find nothing of note.".to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DamageType, MechanismKind, TrapEffect, TrapKind, TriggerCondition};
    use crate::ids::{LockId, MechanismId, PuzzleId, TrapId};
    use crate::mechanics::test_support::{commoner, no_dice, rogue, scripted_d20};
    use crate::value_objects::{DiceFormula, Links};

    fn none() -> Vec<ItemId> {
        Vec::new()
    }

    fn blade_trap() -> Trap {
        Trap::new(
            TrapId::new("blade"),
            "swinging blade",
            TrapKind::Mechanical,
            TriggerCondition::Interaction,
            14,
            14,
            TrapEffect::damage(DiceFormula::new(3, 6, 0).expect("valid"), DamageType::Slashing),
        )
    }

    fn wired_lever() -> Mechanism {
        Mechanism::lever(MechanismId::new("lever"), "rusty lever").with_links(
            Links::none()
                .with_trap(TrapId::new("blade"))
                .with_lock(LockId::new("gate"))
                .with_puzzle(PuzzleId::new("vault"), "lever-a"),
        )
    }

    fn toggled_to(result: &MechanismResult) -> Option<&str> {
        match &result.outcome {
            MechanismOutcome::Toggled { to, .. } => Some(to),
            _ => None,
        }
    }

    #[test]
    fn state_cycles_back_after_k_interactions() {
        let mut wheel = Mechanism::new(
            MechanismId::new("wheel"),
            "wheel",
            MechanismKind::Wheel,
            vec!["a".into(), "b".into(), "c".into()],
        )
        .expect("valid");
        for n in 1..=6 {
            let result = interact_with_mechanism(&commoner(), &mut wheel, &none(), None, &no_dice());
            assert!(result.success);
            if n % 3 == 0 {
                assert_eq!(wheel.current_state(), "a");
            }
        }
    }

    #[test]
    fn hidden_mechanism_rejects_interaction() {
        let mut lever = wired_lever().hidden(15);
        let result = interact_with_mechanism(&commoner(), &mut lever, &none(), None, &no_dice());
        assert_eq!(result.outcome, MechanismOutcome::Hidden);
        assert_eq!(lever.current_state(), "off");
    }

    #[test]
    fn moving_mechanism_reports_its_noise() {
        let mut winch = Mechanism::lever(MechanismId::new("winch"), "chain winch")
            .with_noise(NoiseLevel::Loud);
        let result = interact_with_mechanism(&commoner(), &mut winch, &none(), None, &no_dice());
        assert_eq!(result.noise_level, Some(NoiseLevel::Loud));

        let mut hidden = winch.clone().hidden(12);
        let result = interact_with_mechanism(&commoner(), &mut hidden, &none(), None, &no_dice());
        assert_eq!(result.noise_level, None);
    }

    #[test]
    fn entering_on_fires_links() {
        let mut lever = wired_lever();
        let trap = blade_trap();
        let result = interact_with_mechanism(&commoner(), &mut lever, &none(), Some(&trap), &no_dice());

        assert_eq!(toggled_to(&result), Some("on"));
        assert!(result.triggered_trap.is_some());
        assert!(result.link_updates.contains(&LinkUpdate::LockToggle {
            lock_id: LockId::new("gate"),
            action: LockAction::Unlock,
        }));
        assert!(result.link_updates.contains(&LinkUpdate::PuzzleSignal {
            puzzle_id: PuzzleId::new("vault"),
            signal: "lever-a:on".to_string(),
        }));
    }

    #[test]
    fn leaving_on_relocks_without_trap() {
        let mut lever = wired_lever().with_current_state("on").expect("listed");
        let result = interact_with_mechanism(&commoner(), &mut lever, &none(), Some(&blade_trap()), &no_dice());

        assert_eq!(toggled_to(&result), Some("off"));
        assert!(result.triggered_trap.is_none());
        assert!(result.link_updates.contains(&LinkUpdate::LockToggle {
            lock_id: LockId::new("gate"),
            action: LockAction::Lock,
        }));
        assert!(result.link_updates.contains(&LinkUpdate::PuzzleSignal {
            puzzle_id: PuzzleId::new("vault"),
            signal: "lever-a:off".to_string(),
        }));
    }

    #[test]
    fn key_opens_lock_and_toggles() {
        let key = ItemId::new("lever-key");
        let mut lever = wired_lever().locked(Some(key.clone()));
        let result = interact_with_mechanism(&commoner(), &mut lever, &vec![key], None, &no_dice());
        assert!(result.success);
        assert!(!lever.is_locked);
    }

    #[test]
    fn failed_pick_stops_before_toggle() {
        let mut lever = wired_lever().locked(None);
        let tools = vec![ItemId::new("thieves-tools")];
        let result = interact_with_mechanism(&rogue(), &mut lever, &tools, None, &scripted_d20(&[10]));
        assert_eq!(result.outcome, MechanismOutcome::LockHolds);
        assert!(lever.is_locked);
        assert_eq!(lever.current_state(), "off");
    }

    #[test]
    fn successful_pick_continues_to_toggle() {
        let mut lever = wired_lever().locked(None);
        let tools = vec![ItemId::new("thieves-tools")];
        let result = interact_with_mechanism(&rogue(), &mut lever, &tools, None, &scripted_d20(&[11]));
        assert_eq!(toggled_to(&result), Some("on"));
    }

    #[test]
    fn force_needs_a_natural_twenty_and_jams() {
        let mut lever = wired_lever().locked(None);
        let brute = commoner().with_score(Ability::Strength, 20);
        let miss = interact_with_mechanism(&brute, &mut lever, &none(), None, &scripted_d20(&[19]));
        assert_eq!(miss.outcome, MechanismOutcome::LockHolds);
        assert_eq!(miss.check.map(|c| c.margin), Some(-1));

        let forced = interact_with_mechanism(&brute, &mut lever, &none(), None, &scripted_d20(&[20]));
        assert_eq!(forced.outcome, MechanismOutcome::ForcedButJammed);
        assert!(!lever.is_locked);
        assert!(lever.is_stuck);
        assert_eq!(lever.current_state(), "off");
    }

    #[test]
    fn oil_helps_free_a_stuck_mechanism() {
        let mut lever = wired_lever().stuck(Some(14));
        let oil = vec![ItemId::new("oil-flask")];
        // 12 + 0 (Str) + 2 (oil) = 14
        let result = interact_with_mechanism(&commoner(), &mut lever, &oil, None, &scripted_d20(&[12]));
        assert!(result.success);
        assert_eq!(result.consumed_item, Some(ItemId::new("oil-flask")));
        assert!(!lever.is_stuck);
    }

    #[test]
    fn stuck_mechanism_stays_put_on_failure() {
        let mut lever = wired_lever().stuck(None);
        let result = interact_with_mechanism(&commoner(), &mut lever, &none(), None, &scripted_d20(&[14]));
        assert_eq!(result.outcome, MechanismOutcome::StillStuck);
        assert!(lever.is_stuck);
        assert_eq!(lever.current_state(), "off");
    }

    #[test]
    fn detection_reveals() {
        let mut lever = wired_lever().hidden(12);
        let result = detect_mechanism(&commoner(), &mut lever, &scripted_d20(&[12]));
        assert!(result.detected);
        assert!(!lever.is_hidden);
    }
}
