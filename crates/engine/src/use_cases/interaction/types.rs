//! Types returned by interaction use cases.

use serde::{Deserialize, Serialize};

use delve_domain::{DamageType, DiceRollResult};

use crate::stores::LinkReport;

/// Damage rolled for an effect that went off during an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRoll {
    /// What dealt the damage, e.g. `trap:darts`
    pub source: String,
    pub damage_type: Option<DamageType>,
    pub roll: DiceRollResult,
}

/// A rules result plus everything the orchestrator did because of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction<R> {
    pub result: R,
    pub links: LinkReport,
    pub damage: Vec<DamageRoll>,
}

impl<R> Interaction<R> {
    pub fn total_damage(&self) -> i32 {
        self.damage.iter().map(|d| d.roll.total.max(0)).sum()
    }
}
