//! Secret doors: `Hidden -> Detected -> Open <-> Closed`.

use serde::{Deserialize, Serialize};

use super::bonus_if;
use crate::check::roll_check;
use crate::entities::{DoorState, SecretDoor};
use crate::ports::{ActorStats, DiceRoller, Proficiency};
use crate::value_objects::{Ability, Skill};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDoorResult {
    pub success: bool,
    pub margin: i32,
    pub state: DoorState,
    /// Set only on the search that discovers the door
    pub xp_award: Option<u32>,
    pub message: String,
}

/// What an investigation turned up. Never changes the door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanismInsight {
    pub success: bool,
    pub margin: i32,
    pub description: Option<String>,
}

fn searches_well(actor: &dyn ActorStats) -> bool {
    actor.is_proficient(Proficiency::Skill(Skill::Perception))
        || actor.has_class("Rogue")
        || actor.has_class("Ranger")
}

/// Search a wall for a hidden door with a Wisdom check.
pub fn search_for_secret_door(
    actor: &dyn ActorStats,
    door: &mut SecretDoor,
    dice: &dyn DiceRoller,
) -> SecretDoorResult {
    if door.state.is_discovered() {
        return SecretDoorResult {
            success: true,
            margin: 0,
            state: door.state,
            xp_award: None,
            message: format!("You already know where the {} is.", door.name),
        };
    }

    let modifier = actor.ability_modifier(Ability::Wisdom) + bonus_if(actor, searches_well(actor));
    let check = roll_check(dice, modifier, door.detection_dc);

    if check.success {
        door.state = DoorState::Detected;
        tracing::info!(door_id = %door.id, margin = check.margin, "Secret door discovered");
    }

    SecretDoorResult {
        success: check.success,
        margin: check.margin,
        state: door.state,
        xp_award: if check.success { door.xp_award } else { None },
        message: if check.success {
            format!("You discover the {}!", door.name)
        } else {
            "The wall seems solid.".to_string()
        },
    }
}

/// Study a discovered door to learn how it opens.
pub fn investigate_mechanism(
    actor: &dyn ActorStats,
    door: &SecretDoor,
    dice: &dyn DiceRoller,
) -> MechanismInsight {
    if !door.state.is_discovered() {
        return MechanismInsight {
            success: false,
            margin: 0,
            description: None,
        };
    }

    let modifier = actor.ability_modifier(Ability::Intelligence)
        + bonus_if(
            actor,
            actor.is_proficient(Proficiency::Skill(Skill::Investigation)),
        );
    let check = roll_check(dice, modifier, door.mechanism_dc);

    MechanismInsight {
        success: check.success,
        margin: check.margin,
        description: check.success.then(|| door.mechanism_description.clone()),
    }
}

/// Open or close a discovered, unlocked door.
pub fn operate_secret_door(door: &mut SecretDoor) -> SecretDoorResult {
    if door.is_locked {
        return SecretDoorResult {
            success: false,
            margin: 0,
            state: door.state,
            xp_award: None,
            message: "It will not move. Something holds it shut.".to_string(),
        };
    }

    let next = match door.state {
        DoorState::Hidden => {
            return SecretDoorResult {
                success: false,
                margin: 0,
                state: door.state,
                xp_award: None,
                message: "You see no door here.".to_string(),
            };
        }
        DoorState::Detected | DoorState::Closed => DoorState::Open,
        DoorState::Open => DoorState::Closed,
    };

    door.state = next;
    tracing::info!(door_id = %door.id, state = ?next, "Secret door operated");
    SecretDoorResult {
        success: true,
        margin: 0,
        state: next,
        xp_award: None,
        message: match next {
            DoorState::Open => format!("The {} swings open.", door.name),
            _ => format!("The {} grinds shut.", door.name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DoorId;
    use crate::mechanics::test_support::{commoner, no_dice, scripted_d20};

    fn bookcase() -> SecretDoor {
        SecretDoor::new(
            DoorId::new("bookcase"),
            "bookcase door",
            15,
            13,
            "Pull the red tome to release the latch.",
        )
    }

    #[test]
    fn rangers_search_with_proficiency() {
        let ranger = commoner().with_class("Ranger").with_score(Ability::Wisdom, 14);
        let mut door = bookcase();
        // 11 + 2 (Wis) + 2 (proficiency) = 15
        let result = search_for_secret_door(&ranger, &mut door, &scripted_d20(&[11]));
        assert!(result.success);
        assert_eq!(door.state, DoorState::Detected);
    }

    #[test]
    fn discovery_awards_xp_once() {
        let mut door = bookcase().with_xp_award(50);
        let missed = search_for_secret_door(&commoner(), &mut door, &scripted_d20(&[2]));
        assert_eq!(missed.xp_award, None);

        let found = search_for_secret_door(&commoner(), &mut door, &scripted_d20(&[15]));
        assert_eq!(found.xp_award, Some(50));

        let again = search_for_secret_door(&commoner(), &mut door, &no_dice());
        assert_eq!(again.xp_award, None);
    }

    #[test]
    fn failed_search_leaves_door_hidden() {
        let mut door = bookcase();
        let result = search_for_secret_door(&commoner(), &mut door, &scripted_d20(&[14]));
        assert!(!result.success);
        assert_eq!(door.state, DoorState::Hidden);
    }

    #[test]
    fn found_doors_report_success_without_rolling() {
        let mut door = bookcase().in_state(DoorState::Open);
        let result = search_for_secret_door(&commoner(), &mut door, &no_dice());
        assert!(result.success);
        assert_eq!(result.state, DoorState::Open);
    }

    #[test]
    fn investigation_is_read_only() {
        let door = bookcase().in_state(DoorState::Detected);
        let insight = investigate_mechanism(&commoner(), &door, &scripted_d20(&[13]));
        assert!(insight.success);
        assert_eq!(insight.description.as_deref(), Some("Pull the red tome to release the latch."));
        assert_eq!(door, bookcase().in_state(DoorState::Detected));

        let hidden = investigate_mechanism(&commoner(), &bookcase(), &no_dice());
        assert!(hidden.description.is_none());
    }

    #[test]
    fn operating_cycles_open_and_closed() {
        let mut door = bookcase().in_state(DoorState::Detected);
        assert_eq!(operate_secret_door(&mut door).state, DoorState::Open);
        assert_eq!(operate_secret_door(&mut door).state, DoorState::Closed);
        assert_eq!(operate_secret_door(&mut door).state, DoorState::Open);
    }

    #[test]
    fn hidden_door_cannot_be_operated() {
        let mut door = bookcase();
        assert!(!operate_secret_door(&mut door).success);
        assert_eq!(door.state, DoorState::Hidden);
    }

    #[test]
    fn locked_door_always_fails() {
        for state in [DoorState::Hidden, DoorState::Detected, DoorState::Open, DoorState::Closed] {
            let mut door = bookcase().locked().in_state(state);
            let result = operate_secret_door(&mut door);
            assert!(!result.success);
            assert_eq!(door.state, state);
        }
    }
}
