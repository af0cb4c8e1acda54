use serde::{Deserialize, Serialize};

use crate::entities::Trap;
use crate::ids::{ItemId, LockId};

/// A mundane barrier: a locked door, chest or gate.
///
/// Locks are never deleted, only state-flipped: picking clears `is_locked`,
/// breaking sets `is_broken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    pub id: LockId,
    /// Lockpicking DC
    pub dc: i32,
    pub key_id: Option<ItemId>,
    #[serde(rename = "breakDC")]
    pub break_dc: Option<i32>,
    #[serde(rename = "breakHP")]
    pub break_hp: Option<i32>,
    #[serde(rename = "currentHP")]
    pub current_hp: Option<i32>,
    /// Trap wired into the lock mechanism itself
    pub trap: Option<Trap>,
    pub is_locked: bool,
    #[serde(default)]
    pub is_broken: bool,
}

impl Lock {
    pub fn new(id: LockId, dc: i32) -> Self {
        Self {
            id,
            dc,
            key_id: None,
            break_dc: None,
            break_hp: None,
            current_hp: None,
            trap: None,
            is_locked: true,
            is_broken: false,
        }
    }

    pub fn with_key(mut self, key_id: ItemId) -> Self {
        self.key_id = Some(key_id);
        self
    }

    pub fn with_break_dc(mut self, dc: i32) -> Self {
        self.break_dc = Some(dc);
        self
    }

    pub fn with_break_hp(mut self, hp: i32) -> Self {
        self.break_hp = Some(hp);
        self.current_hp = Some(hp);
        self
    }

    pub fn with_trap(mut self, trap: Trap) -> Self {
        self.trap = Some(trap);
        self
    }

    pub fn unlocked(mut self) -> Self {
        self.is_locked = false;
        self
    }

    pub fn is_breakable(&self) -> bool {
        self.break_dc.is_some() || self.break_hp.is_some()
    }

    /// Whether the lock still bars passage. A broken lock no longer does.
    pub fn is_barring(&self) -> bool {
        self.is_locked && !self.is_broken
    }

    pub fn is_trapped(&self) -> bool {
        self.trap.is_some()
    }
}
