//! Interaction records
//!
//! Every record is a plain, independently addressable value. Relations
//! between records are ids resolved by the orchestrator; the only nesting is
//! a trap wired directly into a lock.

mod character;
mod lock;
mod mechanism;
mod pressure_plate;
mod puzzle;
mod secret_door;
mod skill_challenge;
mod trap;

pub use character::Character;
pub use lock::Lock;
pub use mechanism::{Mechanism, MechanismKind, NoiseLevel};
pub use pressure_plate::{PressurePlate, ResetBehavior};
pub use puzzle::{
    CipherData, CipherMethod, Puzzle, PuzzleFailure, PuzzleKind, PuzzleSuccess, DEFAULT_HINT_DC,
};
pub use secret_door::{DoorState, SecretDoor};
pub use skill_challenge::{
    ChallengeFailure, ChallengeRewards, ChallengeSkill, ChallengeStatus, ChallengeSuccess,
    SkillChallenge, CREATIVE_DC_PENALTY,
};
pub use trap::{
    DamageType, EffectTag, StatusCondition, Trap, TrapDamage, TrapEffect, TrapKind,
    TriggerCondition,
};
