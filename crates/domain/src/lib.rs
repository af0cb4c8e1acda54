//! Rules core for physical and arcane interactions.
//!
//! Pure and deterministic: every random draw goes through the injected
//! [`DiceRoller`] port, so a scripted roller reproduces any outcome exactly.

pub mod check;
pub mod entities;
pub mod error;
pub mod ids;
pub mod mechanics;
pub mod ports;
pub mod value_objects;

pub use check::{
    resolve, roll_check, slips, triggers_trap, CheckOutcome, CheckRoll, Severity,
    MISSING_TOOLS_MARGIN, WRONG_TRAP_KIND_MARGIN,
};

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    ChallengeFailure, ChallengeRewards, ChallengeSkill, ChallengeStatus, ChallengeSuccess,
    Character, CipherData, CipherMethod, DamageType, DoorState, EffectTag, Lock, Mechanism,
    MechanismKind, NoiseLevel, PressurePlate, Puzzle, PuzzleFailure, PuzzleKind, PuzzleSuccess,
    ResetBehavior, SecretDoor, SkillChallenge, StatusCondition, Trap, TrapDamage, TrapEffect,
    TrapKind, TriggerCondition, CREATIVE_DC_PENALTY, DEFAULT_HINT_DC,
};

pub use error::DomainError;

pub use ids::{ChallengeId, DoorId, ItemId, LockId, MechanismId, PlateId, PuzzleId, TrapId};

// Interaction rules
pub use mechanics::arcane_glyph::{
    detect_glyph, disarm_glyph, identify_glyph_school, GlyphIdentification, GlyphSchool,
};
pub use mechanics::cipher::{
    attempt_cipher_solution, attempt_decipher, caesar_shift, decode_caesar, displayed_text,
    initialize_cipher, DecipherResult,
};
pub use mechanics::lock_trap::{
    attempt_break, attempt_lockpick, detect_trap, disarm_trap, unlock_with_key, BreakResult,
    LockpickResult, TrapDetectionResult, TrapDisarmResult, DEFAULT_BREAK_DC,
};
pub use mechanics::mechanism::{
    detect_mechanism, interact_with_mechanism, MechanismOutcome, MechanismResult,
};
pub use mechanics::pressure_plate::{
    check_pressure_plate, detect_pressure_plate, jam_pressure_plate, release_pressure_plate,
    PressurePlateJamResult, PressurePlateResult,
};
pub use mechanics::puzzle::{
    attempt_puzzle_hint, attempt_puzzle_input, check_puzzle_hint, HintResult, PuzzleConsequence,
    PuzzleResult,
};
pub use mechanics::secret_door::{
    investigate_mechanism, operate_secret_door, search_for_secret_door, MechanismInsight,
    SecretDoorResult,
};
pub use mechanics::skill_challenge::{
    attempt_skill_challenge, ChallengeAttempt, SkillChallengeResult,
};
pub use mechanics::{DetectionResult, ARCANE_CLASSES, THIEVES_TOOLS_IDS};

pub use ports::{ActorStats, DiceRoller, DiceRollerExt, InventoryQuery, Proficiency};

#[cfg(any(test, feature = "testing"))]
pub use ports::MockDiceRoller;

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    Ability, AbilityScores, DiceFormula, DiceParseError, DiceRollResult, LinkUpdate, Links,
    LockAction, PuzzleLink, Size, Skill, TriggeredTrap,
};
