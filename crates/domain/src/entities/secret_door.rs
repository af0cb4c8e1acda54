use serde::{Deserialize, Serialize};

use crate::ids::{DoorId, LockId};

/// `Hidden -> Detected -> Open <-> Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    #[default]
    Hidden,
    Detected,
    Open,
    Closed,
}

impl DoorState {
    pub fn is_discovered(&self) -> bool {
        !matches!(self, DoorState::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDoor {
    pub id: DoorId,
    pub name: String,
    #[serde(rename = "detectionDC")]
    pub detection_dc: i32,
    #[serde(rename = "mechanismDC")]
    pub mechanism_dc: i32,
    pub mechanism_description: String,
    #[serde(default)]
    pub is_locked: bool,
    /// Lock whose state this door mirrors
    pub linked_lock_id: Option<LockId>,
    #[serde(default)]
    pub state: DoorState,
    /// Experience granted to whoever discovers the door
    pub xp_award: Option<u32>,
}

impl SecretDoor {
    pub fn new(
        id: DoorId,
        name: impl Into<String>,
        detection_dc: i32,
        mechanism_dc: i32,
        mechanism_description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            detection_dc,
            mechanism_dc,
            mechanism_description: mechanism_description.into(),
            is_locked: false,
            linked_lock_id: None,
            state: DoorState::Hidden,
            xp_award: None,
        }
    }

    pub fn linked_to(mut self, lock_id: LockId) -> Self {
        self.linked_lock_id = Some(lock_id);
        self.is_locked = true;
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    pub fn with_xp_award(mut self, xp: u32) -> Self {
        self.xp_award = Some(xp);
        self
    }

    pub fn in_state(mut self, state: DoorState) -> Self {
        self.state = state;
        self
    }
}
