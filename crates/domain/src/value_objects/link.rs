//! Cross-entity links and the side effects they carry.
//!
//! Devices never touch the records they are wired to. They return
//! [`LinkUpdate`]s that the orchestrator resolves by id and applies.

use serde::{Deserialize, Serialize};

use crate::entities::TrapEffect;
use crate::ids::{LockId, PuzzleId, TrapId};

/// A puzzle target plus the signal string sent to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleLink {
    pub puzzle_id: PuzzleId,
    pub signal: String,
}

/// Optional outgoing wiring shared by plates and mechanisms.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Links {
    #[serde(rename = "linkedTrapId")]
    pub trap_id: Option<TrapId>,
    #[serde(rename = "linkedLockId")]
    pub lock_id: Option<LockId>,
    #[serde(rename = "linkedPuzzle")]
    pub puzzle: Option<PuzzleLink>,
}

impl Links {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_trap(mut self, trap_id: TrapId) -> Self {
        self.trap_id = Some(trap_id);
        self
    }

    pub fn with_lock(mut self, lock_id: LockId) -> Self {
        self.lock_id = Some(lock_id);
        self
    }

    pub fn with_puzzle(mut self, puzzle_id: PuzzleId, signal: impl Into<String>) -> Self {
        self.puzzle = Some(PuzzleLink {
            puzzle_id,
            signal: signal.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockAction {
    Unlock,
    Lock,
    Toggle,
}

impl LockAction {
    /// The locked flag after applying this action to `locked`.
    pub fn apply(self, locked: bool) -> bool {
        match self {
            LockAction::Unlock => false,
            LockAction::Lock => true,
            LockAction::Toggle => !locked,
        }
    }
}

/// A trap that went off during an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredTrap {
    pub trap_id: TrapId,
    pub effect: TrapEffect,
}

/// A side effect on another entity, applied by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkUpdate {
    LockToggle {
        lock_id: LockId,
        action: LockAction,
    },
    PuzzleSignal {
        puzzle_id: PuzzleId,
        signal: String,
    },
    TrapTriggered {
        trap_id: TrapId,
        effect: TrapEffect,
    },
}

impl LinkUpdate {
    /// Human-readable target, for logging.
    pub fn target(&self) -> String {
        match self {
            LinkUpdate::LockToggle { lock_id, .. } => format!("lock:{}", lock_id),
            LinkUpdate::PuzzleSignal { puzzle_id, .. } => format!("puzzle:{}", puzzle_id),
            LinkUpdate::TrapTriggered { trap_id, .. } => format!("trap:{}", trap_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_updates_are_tagged() {
        let update = LinkUpdate::LockToggle {
            lock_id: LockId::new("portcullis"),
            action: LockAction::Unlock,
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json["kind"], "lock_toggle");
        assert_eq!(json["action"], "unlock");
        assert_eq!(update.target(), "lock:portcullis");
    }

    #[test]
    fn lock_actions() {
        assert!(!LockAction::Unlock.apply(true));
        assert!(LockAction::Lock.apply(false));
        assert!(LockAction::Toggle.apply(false));
        assert!(!LockAction::Toggle.apply(true));
    }
}
