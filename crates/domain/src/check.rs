//! Check resolution
//!
//! Every interaction reduces to `d20 + modifier` against a DC. The signed
//! margin drives everything downstream: success at `margin >= 0`, a trap
//! fires only when the attempt misses by more than five, a jam slips at
//! exactly five or worse.

use serde::{Deserialize, Serialize};

use crate::ports::{DiceRoller, DiceRollerExt};

/// Margin reported when a tool-gated action is attempted without tools.
pub const MISSING_TOOLS_MARGIN: i32 = -10;

/// Margin reported when a trap is handed to the wrong module.
pub const WRONG_TRAP_KIND_MARGIN: i32 = -10;

/// Margin at or below which a failed attempt is catastrophic.
const CATASTROPHE_THRESHOLD: i32 = -5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub success: bool,
    pub margin: i32,
}

/// Resolve a check from a known roll.
pub fn resolve(roll: i32, modifiers: i32, dc: i32) -> CheckOutcome {
    let margin = roll + modifiers - dc;
    CheckOutcome {
        success: margin >= 0,
        margin,
    }
}

/// A fully rolled check, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRoll {
    pub roll: i32,
    pub modifier: i32,
    pub dc: i32,
    pub total: i32,
    pub margin: i32,
    pub success: bool,
}

impl CheckRoll {
    pub fn severity(&self) -> Severity {
        Severity::of(self.margin)
    }

    /// e.g. "d20(11) + 4 = 15 vs DC 15"
    pub fn breakdown(&self) -> String {
        let modifier = if self.modifier < 0 {
            format!("- {}", -self.modifier)
        } else {
            format!("+ {}", self.modifier)
        };
        format!(
            "d20({}) {} = {} vs DC {}",
            self.roll, modifier, self.total, self.dc
        )
    }
}

/// Roll a d20 check through the injected roller.
pub fn roll_check(dice: &dyn DiceRoller, modifier: i32, dc: i32) -> CheckRoll {
    let roll = dice.roll_d20();
    let outcome = resolve(roll, modifier, dc);
    tracing::debug!(
        roll,
        modifier,
        dc,
        margin = outcome.margin,
        success = outcome.success,
        "Check resolved"
    );
    CheckRoll {
        roll,
        modifier,
        dc,
        total: roll + modifier,
        margin: outcome.margin,
        success: outcome.success,
    }
}

/// Graded result of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    /// Missed by five or less
    MarginalFailure,
    /// Missed by more than five
    CatastrophicFailure,
}

impl Severity {
    pub fn of(margin: i32) -> Self {
        if margin >= 0 {
            Severity::Success
        } else if margin >= CATASTROPHE_THRESHOLD {
            Severity::MarginalFailure
        } else {
            Severity::CatastrophicFailure
        }
    }
}

/// Whether a failed attempt sets off an armed trap. Exactly -5 is safe.
pub fn triggers_trap(margin: i32) -> bool {
    margin < CATASTROPHE_THRESHOLD
}

/// Whether a failed jam attempt presses the plate. Exactly -5 slips.
pub fn slips(margin: i32) -> bool {
    margin <= CATASTROPHE_THRESHOLD
}
