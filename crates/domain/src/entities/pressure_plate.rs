use serde::{Deserialize, Serialize};

use crate::ids::PlateId;
use crate::value_objects::{Links, Size};

/// What happens to a plate once the weight comes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetBehavior {
    /// Stays down until someone resets it.
    #[default]
    Manual,
    /// Springs back immediately.
    AutoInstant,
    /// Springs back after a delay managed by the caller.
    AutoDelayed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressurePlate {
    pub id: PlateId,
    pub name: String,
    /// Smallest creature size that depresses the plate
    pub min_size: Size,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(rename = "detectionDC")]
    pub detection_dc: i32,
    #[serde(rename = "jamDC")]
    pub jam_dc: i32,
    #[serde(default)]
    pub reset_behavior: ResetBehavior,
    #[serde(default)]
    pub is_pressed: bool,
    #[serde(default)]
    pub is_jammed: bool,
    #[serde(flatten)]
    pub links: Links,
}

impl PressurePlate {
    pub fn new(id: PlateId, name: impl Into<String>, min_size: Size) -> Self {
        Self {
            id,
            name: name.into(),
            min_size,
            is_hidden: false,
            detection_dc: 10,
            jam_dc: 10,
            reset_behavior: ResetBehavior::Manual,
            is_pressed: false,
            is_jammed: false,
            links: Links::none(),
        }
    }

    pub fn hidden(mut self, detection_dc: i32) -> Self {
        self.is_hidden = true;
        self.detection_dc = detection_dc;
        self
    }

    pub fn with_jam_dc(mut self, jam_dc: i32) -> Self {
        self.jam_dc = jam_dc;
        self
    }

    pub fn with_reset_behavior(mut self, reset_behavior: ResetBehavior) -> Self {
        self.reset_behavior = reset_behavior;
        self
    }

    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }
}
