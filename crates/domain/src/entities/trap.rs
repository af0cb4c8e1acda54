//! Trap records, mechanical or magical.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::TrapId;
use crate::value_objects::{Ability, DiceFormula};

/// The stimulus that can set a trap off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    Touch,
    Proximity,
    Interaction,
    Timer,
    Magic,
    Glyph,
}

/// Which module is allowed to process a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrapKind {
    #[default]
    Mechanical,
    Magical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapDamage {
    pub formula: DiceFormula,
    pub damage_type: DamageType,
}

/// A named status condition such as "Poisoned" or "Charmed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCondition {
    pub name: String,
    /// Duration in rounds; `None` lasts until removed.
    pub duration: Option<u32>,
}

impl StatusCondition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }
}

/// Effect tag carried by older trap definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    Teleport,
    Restrain,
    Condition,
}

/// What happens to whoever sets the trap off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapEffect {
    pub damage: Option<TrapDamage>,
    pub condition: Option<StatusCondition>,
    pub save_dc: Option<i32>,
    pub save_ability: Option<Ability>,
    pub tag: Option<EffectTag>,
}

impl TrapEffect {
    pub fn damage(formula: DiceFormula, damage_type: DamageType) -> Self {
        Self {
            damage: Some(TrapDamage {
                formula,
                damage_type,
            }),
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, condition: StatusCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_save(mut self, dc: i32, ability: Ability) -> Self {
        self.save_dc = Some(dc);
        self.save_ability = Some(ability);
        self
    }

    pub fn with_tag(mut self, tag: EffectTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn damage_type(&self) -> Option<DamageType> {
        self.damage.as_ref().map(|d| d.damage_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trap {
    pub id: TrapId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TrapKind,
    pub trigger_condition: TriggerCondition,
    #[serde(rename = "detectionDC")]
    pub detection_dc: i32,
    #[serde(rename = "disarmDC")]
    pub disarm_dc: i32,
    pub effect: TrapEffect,
    #[serde(default)]
    pub resetable: bool,
    #[serde(default)]
    pub is_disarmed: bool,
    #[serde(default)]
    pub is_triggered: bool,
}

impl Trap {
    pub fn new(
        id: TrapId,
        name: impl Into<String>,
        kind: TrapKind,
        trigger_condition: TriggerCondition,
        detection_dc: i32,
        disarm_dc: i32,
        effect: TrapEffect,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            trigger_condition,
            detection_dc,
            disarm_dc,
            effect,
            resetable: false,
            is_disarmed: false,
            is_triggered: false,
        }
    }

    pub fn resetable(mut self) -> Self {
        self.resetable = true;
        self
    }

    /// A disarmed or spent trap. Resolved traps never fire.
    pub fn is_resolved(&self) -> bool {
        self.is_disarmed || self.is_triggered
    }

    pub fn is_armed(&self) -> bool {
        !self.is_resolved()
    }

    /// Fire the trap if it is armed, returning the effect to apply.
    pub fn trigger(&mut self) -> Option<TrapEffect> {
        if self.is_resolved() {
            return None;
        }
        self.is_triggered = true;
        tracing::info!(trap_id = %self.id, trap = %self.name, "Trap triggered");
        Some(self.effect.clone())
    }

    /// Re-arm a spent resetable trap.
    pub fn reset(&mut self) -> Result<(), DomainError> {
        if !self.resetable {
            return Err(DomainError::invalid_state_transition(format!(
                "Trap {} cannot be reset",
                self.id
            )));
        }
        if self.is_disarmed {
            return Err(DomainError::invalid_state_transition(format!(
                "Trap {} has been disarmed",
                self.id
            )));
        }
        self.is_triggered = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needle_trap() -> Trap {
        Trap::new(
            TrapId::new("needle"),
            "Poison Needle",
            TrapKind::Mechanical,
            TriggerCondition::Touch,
            15,
            15,
            TrapEffect::damage(
                DiceFormula::new(1, 4, 0).expect("valid"),
                DamageType::Poison,
            ),
        )
    }

    #[test]
    fn trap_fires_once() {
        let mut trap = needle_trap();
        assert!(trap.trigger().is_some());
        assert!(trap.is_triggered);
        assert!(trap.trigger().is_none());
    }

    #[test]
    fn disarmed_trap_never_fires() {
        let mut trap = needle_trap();
        trap.is_disarmed = true;
        assert!(trap.trigger().is_none());
        assert!(!trap.is_triggered);
    }

    #[test]
    fn reset_rearms_only_resetable_traps() {
        let mut trap = needle_trap();
        trap.trigger();
        assert!(matches!(
            trap.reset(),
            Err(DomainError::InvalidStateTransition(_))
        ));

        let mut trap = needle_trap().resetable();
        trap.trigger();
        trap.reset().expect("resetable trap re-arms");
        assert!(trap.is_armed());
    }

    #[test]
    fn trap_serializes_with_authoring_field_names() {
        let json = serde_json::to_value(needle_trap()).expect("serialize");
        assert_eq!(json["type"], "mechanical");
        assert_eq!(json["detectionDC"], 15);
        assert_eq!(json["triggerCondition"], "touch");
        assert_eq!(json["effect"]["damage"]["damageType"], "poison");
    }
}
