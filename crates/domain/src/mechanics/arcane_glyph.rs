//! Magical traps: glyphs and wards.
//!
//! Parallel to mundane traps but gated to [`TrapKind::Magical`], keyed off
//! Intelligence, and indifferent to thieves' tools.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lock_trap::{resolve_disarm, TrapDetectionResult, TrapDisarmResult};
use super::{bonus_if, proficient_in_arcana};
use crate::check::{roll_check, WRONG_TRAP_KIND_MARGIN};
use crate::entities::{DamageType, EffectTag, Trap, TrapKind};
use crate::ports::{ActorStats, DiceRoller};
use crate::value_objects::Ability;

/// Extra DC for reading a glyph's school over merely noticing it.
const IDENTIFY_DC_BONUS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphSchool {
    Abjuration,
    Conjuration,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl GlyphSchool {
    pub fn description(&self) -> &'static str {
        match self {
            GlyphSchool::Abjuration => "Abjuration (Warding)",
            GlyphSchool::Conjuration => "Conjuration (Teleportation)",
            GlyphSchool::Enchantment => "Enchantment (Mind Affecting)",
            GlyphSchool::Evocation => "Evocation (Elemental Energy)",
            GlyphSchool::Illusion => "Illusion",
            GlyphSchool::Necromancy => "Necromancy",
            GlyphSchool::Transmutation => "Transmutation (Binding)",
        }
    }

    /// Classify a glyph by what it does when it goes off.
    pub fn of(trap: &Trap) -> Self {
        let effect = &trap.effect;
        let condition = effect.condition.as_ref().map(|c| c.name.as_str());

        match (effect.damage_type(), effect.tag, condition) {
            (Some(DamageType::Fire | DamageType::Lightning | DamageType::Cold), _, _) => {
                GlyphSchool::Evocation
            }
            (_, Some(EffectTag::Teleport), _) => GlyphSchool::Conjuration,
            (_, Some(EffectTag::Restrain), _) => GlyphSchool::Transmutation,
            (_, Some(EffectTag::Condition), Some(name))
                if name.eq_ignore_ascii_case("fear") || name.eq_ignore_ascii_case("charmed") =>
            {
                GlyphSchool::Enchantment
            }
            (_, Some(EffectTag::Condition), Some(name)) if name.eq_ignore_ascii_case("invisible") => {
                GlyphSchool::Illusion
            }
            (Some(DamageType::Necrotic), _, _) => GlyphSchool::Necromancy,
            _ => GlyphSchool::Abjuration,
        }
    }
}

impl fmt::Display for GlyphSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphIdentification {
    pub success: bool,
    pub margin: i32,
    /// `None` when identification failed
    pub school: Option<GlyphSchool>,
}

fn arcane_bonus(actor: &dyn ActorStats) -> i32 {
    bonus_if(actor, proficient_in_arcana(actor))
}

/// Notice a glyph: d20 + the better of Int and Wis (+ arcane proficiency).
pub fn detect_glyph(actor: &dyn ActorStats, glyph: &Trap, dice: &dyn DiceRoller) -> TrapDetectionResult {
    if glyph.is_resolved() {
        return TrapDetectionResult {
            success: true,
            margin: 0,
            trap_detected: true,
            message: format!("The spent {} is plain to see.", glyph.name),
        };
    }

    if glyph.kind != TrapKind::Magical {
        tracing::warn!(trap_id = %glyph.id, "Mechanical trap handed to glyph detection, refusing");
        return TrapDetectionResult {
            success: false,
            margin: WRONG_TRAP_KIND_MARGIN,
            trap_detected: false,
            message: "You sense no magic here.".to_string(),
        };
    }

    let modifier = actor
        .ability_modifier(Ability::Intelligence)
        .max(actor.ability_modifier(Ability::Wisdom))
        + arcane_bonus(actor);
    let check = roll_check(dice, modifier, glyph.detection_dc);

    if check.success {
        tracing::info!(trap_id = %glyph.id, "Glyph detected");
    }

    TrapDetectionResult {
        success: check.success,
        margin: check.margin,
        trap_detected: check.success,
        message: if check.success {
            format!("Faint runes reveal a {}.", glyph.name)
        } else {
            "The air feels still.".to_string()
        },
    }
}

/// Suppress a glyph with an Intelligence check. Tools do not help.
pub fn disarm_glyph(actor: &dyn ActorStats, glyph: &mut Trap, dice: &dyn DiceRoller) -> TrapDisarmResult {
    if glyph.is_disarmed {
        return TrapDisarmResult {
            success: true,
            margin: 0,
            triggered_trap: None,
            message: "The glyph is already inert.".to_string(),
        };
    }

    if glyph.kind != TrapKind::Magical {
        return TrapDisarmResult::wrong_kind(glyph, TrapKind::Magical);
    }

    let modifier = actor.ability_modifier(Ability::Intelligence) + arcane_bonus(actor);
    let check = roll_check(dice, modifier, glyph.disarm_dc);

    resolve_disarm(glyph, check, "The runes fade as you unravel the ward.")
}

/// Read a glyph's school without setting it off. Never mutates the glyph.
pub fn identify_glyph_school(
    actor: &dyn ActorStats,
    glyph: &Trap,
    dice: &dyn DiceRoller,
) -> GlyphIdentification {
    if glyph.kind != TrapKind::Magical {
        return GlyphIdentification {
            success: false,
            margin: WRONG_TRAP_KIND_MARGIN,
            school: None,
        };
    }

    let modifier = actor.ability_modifier(Ability::Intelligence) + arcane_bonus(actor);
    let check = roll_check(dice, modifier, glyph.detection_dc + IDENTIFY_DC_BONUS);

    GlyphIdentification {
        success: check.success,
        margin: check.margin,
        school: check.success.then(|| GlyphSchool::of(glyph)),
    }
}
