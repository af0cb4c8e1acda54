use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ItemId, MechanismId};
use crate::value_objects::Links;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    Lever,
    Button,
    Wheel,
    Winch,
    Valve,
}

/// How far the sound of operating a mechanism carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseLevel {
    Silent,
    Quiet,
    Loud,
    Deafening,
}

/// A multi-position device that cycles through named states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mechanism {
    pub id: MechanismId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MechanismKind,
    /// Positions in cycling order
    states: Vec<String>,
    current_state: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(rename = "detectionDC")]
    pub detection_dc: i32,
    #[serde(default)]
    pub is_locked: bool,
    pub key_id: Option<ItemId>,
    #[serde(default)]
    pub is_stuck: bool,
    #[serde(rename = "stuckDC")]
    pub stuck_dc: Option<i32>,
    pub noise_level: Option<NoiseLevel>,
    #[serde(flatten)]
    pub links: Links,
}

impl Mechanism {
    /// Build a mechanism resting in its first state.
    pub fn new(
        id: MechanismId,
        name: impl Into<String>,
        kind: MechanismKind,
        states: Vec<String>,
    ) -> Result<Self, DomainError> {
        let current_state = states
            .first()
            .cloned()
            .ok_or_else(|| DomainError::validation("Mechanism needs at least one state"))?;
        if let Some(repeated) = states
            .iter()
            .enumerate()
            .find(|(idx, state)| states[..*idx].contains(state))
            .map(|(_, state)| state)
        {
            return Err(DomainError::validation(format!(
                "Mechanism state '{}' is listed twice",
                repeated
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            kind,
            states,
            current_state,
            is_hidden: false,
            detection_dc: 10,
            is_locked: false,
            key_id: None,
            is_stuck: false,
            stuck_dc: None,
            noise_level: None,
            links: Links::none(),
        })
    }

    /// Two-position on/off lever, starting "off".
    pub fn lever(id: MechanismId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: MechanismKind::Lever,
            states: vec!["off".to_string(), "on".to_string()],
            current_state: "off".to_string(),
            is_hidden: false,
            detection_dc: 10,
            is_locked: false,
            key_id: None,
            is_stuck: false,
            stuck_dc: None,
            noise_level: None,
            links: Links::none(),
        }
    }

    pub fn with_current_state(mut self, state: &str) -> Result<Self, DomainError> {
        if !self.states.iter().any(|s| s == state) {
            return Err(DomainError::validation(format!(
                "State '{}' is not one of {:?}",
                state, self.states
            )));
        }
        self.current_state = state.to_string();
        Ok(self)
    }

    pub fn hidden(mut self, detection_dc: i32) -> Self {
        self.is_hidden = true;
        self.detection_dc = detection_dc;
        self
    }

    pub fn locked(mut self, key_id: Option<ItemId>) -> Self {
        self.is_locked = true;
        self.key_id = key_id;
        self
    }

    pub fn stuck(mut self, stuck_dc: Option<i32>) -> Self {
        self.is_stuck = true;
        self.stuck_dc = stuck_dc;
        self
    }

    pub fn with_noise(mut self, noise_level: NoiseLevel) -> Self {
        self.noise_level = Some(noise_level);
        self
    }

    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    /// Move to the next state, wrapping to the first. Returns the new state.
    pub fn advance(&mut self) -> &str {
        let next = self
            .states
            .iter()
            .position(|s| *s == self.current_state)
            .map_or(0, |idx| (idx + 1) % self.states.len());
        if let Some(state) = self.states.get(next) {
            self.current_state = state.clone();
        }
        &self.current_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel() -> Mechanism {
        Mechanism::new(
            MechanismId::new("wheel"),
            "Brass Wheel",
            MechanismKind::Wheel,
            vec!["north".into(), "east".into(), "south".into()],
        )
        .expect("valid mechanism")
    }

    #[test]
    fn empty_state_list_is_rejected() {
        let result = Mechanism::new(
            MechanismId::new("dud"),
            "Dud",
            MechanismKind::Button,
            Vec::new(),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn repeated_state_names_are_rejected() {
        let result = Mechanism::new(
            MechanismId::new("switch"),
            "Switch",
            MechanismKind::Lever,
            vec!["off".into(), "on".into(), "off".into()],
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn cycle_returns_to_start_after_every_state() {
        let mut wheel = wheel();
        let visited: Vec<String> = (0..3).map(|_| wheel.advance().to_string()).collect();
        assert_eq!(visited, vec!["east", "south", "north"]);
    }

    #[test]
    fn start_state_must_be_listed() {
        assert!(wheel().with_current_state("west").is_err());
        let wheel = wheel().with_current_state("south").expect("listed state");
        assert_eq!(wheel.current_state(), "south");
    }

    #[test]
    fn advance_wraps_around() {
        let mut wheel = wheel().with_current_state("south").expect("listed state");
        assert_eq!(wheel.advance(), "north");
        assert_eq!(wheel.advance(), "east");
    }
}
