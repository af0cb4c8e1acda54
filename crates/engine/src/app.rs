//! Application state and composition.

use std::sync::Arc;

use delve_domain::DiceRoller;

use crate::error::EngineError;
use crate::infrastructure::{init_tracing, EngineSettings, SeededDice, SystemDice};
use crate::stores::InteractionRegistry;
use crate::use_cases::InteractionService;

/// Main application state.
///
/// Holds the settings it was built from and the interaction use cases.
pub struct App {
    pub settings: EngineSettings,
    pub interactions: InteractionService,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(settings: EngineSettings, registry: InteractionRegistry) -> Self {
        let dice: Arc<dyn DiceRoller> = match settings.dice_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded dice");
                Arc::new(SeededDice::new(seed))
            }
            None => Arc::new(SystemDice::new()),
        };

        Self {
            interactions: InteractionService::new(dice, registry),
            settings,
        }
    }

    /// Load settings from the environment, install tracing and build an App
    /// around `registry`.
    pub fn from_env(registry: InteractionRegistry) -> Result<Self, EngineError> {
        let settings = EngineSettings::load()?;
        init_tracing(&settings);
        tracing::info!("Starting Delve engine");
        Ok(Self::new(settings, registry))
    }

    /// Build an App from a JSON snapshot of a registry.
    pub fn restore(settings: EngineSettings, snapshot: &str) -> Result<Self, EngineError> {
        Ok(Self::new(settings, InteractionRegistry::restore(snapshot)?))
    }

    pub fn snapshot(&self) -> Result<String, EngineError> {
        self.interactions.registry().snapshot()
    }
}
