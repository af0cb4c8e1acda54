//! Interaction use cases.
//!
//! Each call resolves ids against the registry, runs one rule, applies the
//! link updates the rule handed back and rolls damage for whatever went off.
//! The service is synchronous; callers serialize access to it.

use std::sync::Arc;

use delve_domain::{DamageType, DiceFormula, DiceRoller, LinkUpdate, TrapEffect, TriggeredTrap};

use crate::error::EngineError;
use crate::stores::InteractionRegistry;

mod barriers;
mod devices;
mod puzzles;
mod types;

pub use types::{DamageRoll, Interaction};

pub struct InteractionService {
    dice: Arc<dyn DiceRoller>,
    registry: InteractionRegistry,
}

impl InteractionService {
    pub fn new(dice: Arc<dyn DiceRoller>, registry: InteractionRegistry) -> Self {
        Self { dice, registry }
    }

    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InteractionRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> InteractionRegistry {
        self.registry
    }

    fn roll_damage(
        &self,
        source: String,
        formula: &DiceFormula,
        damage_type: Option<DamageType>,
    ) -> DamageRoll {
        let roll = formula.roll(self.dice.as_ref());
        tracing::info!(source = %source, damage = %roll.breakdown(), "Damage rolled");
        DamageRoll {
            source,
            damage_type,
            roll,
        }
    }

    fn roll_effect(&self, source: String, effect: &TrapEffect) -> Option<DamageRoll> {
        effect
            .damage
            .as_ref()
            .map(|damage| self.roll_damage(source, &damage.formula, Some(damage.damage_type)))
    }

    fn roll_trap(&self, triggered: &TriggeredTrap) -> Option<DamageRoll> {
        self.roll_effect(format!("trap:{}", triggered.trap_id), &triggered.effect)
    }

    /// Apply `updates`, then roll damage for every trap they fired and every
    /// puzzle they failed. `damage` holds rolls already made for the rule's
    /// own effects.
    fn settle<R>(
        &mut self,
        result: R,
        mut damage: Vec<DamageRoll>,
        updates: &[LinkUpdate],
    ) -> Result<Interaction<R>, EngineError> {
        let links = self.registry.apply_link_updates(updates)?;

        damage.extend(links.fired_traps.iter().filter_map(|t| self.roll_trap(t)));
        for reaction in &links.puzzle_reactions {
            let formula = reaction
                .result
                .consequence
                .as_ref()
                .and_then(|c| c.damage.as_ref());
            if let Some(formula) = formula {
                damage.push(self.roll_damage(format!("puzzle:{}", reaction.puzzle_id), formula, None));
            }
        }

        Ok(Interaction {
            result,
            links,
            damage,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use delve_domain::{Ability, Character, MockDiceRoller};

    /// A roller that returns the given faces in order, whatever the die.
    pub fn scripted(faces: &[i32]) -> MockDiceRoller {
        let mut dice = MockDiceRoller::new();
        let mut faces = faces.to_vec().into_iter();
        dice.expect_roll_die()
            .times(faces.len())
            .returning(move |_| faces.next().unwrap_or(1));
        dice
    }

    /// Level 1 Rogue, Dex 14: +2 Dex, +2 proficiency.
    pub fn rogue() -> Character {
        Character::new("Vex", 1)
            .with_class("Rogue")
            .with_score(Ability::Dexterity, 14)
    }

    pub fn commoner() -> Character {
        Character::new("Commoner", 1)
    }
}
