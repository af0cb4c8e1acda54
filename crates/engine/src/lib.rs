//! Delve Engine library.
//!
//! Orchestrates the interaction rules in `delve-domain` over a registry of
//! live records.
//!
//! ## Structure
//!
//! - `stores/` - In-memory registry of locks, traps, devices, doors, puzzles and challenges
//! - `use_cases/` - Interaction orchestration: resolve ids, run a rule, apply its links
//! - `infrastructure/` - Dice adapters, settings loading and tracing setup
//! - `app` - Application composition

pub mod app;
pub mod error;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
pub use error::EngineError;
pub use stores::{InteractionRegistry, LinkReport};
pub use use_cases::{DamageRoll, Interaction, InteractionService};
