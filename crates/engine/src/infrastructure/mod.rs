//! Infrastructure implementations.
//!
//! Dice adapters for the domain's `DiceRoller` port, settings loading and
//! tracing setup.

pub mod dice;
pub mod settings;
pub mod telemetry;

pub use dice::{SeededDice, SystemDice};
pub use settings::EngineSettings;
pub use telemetry::init_tracing;
