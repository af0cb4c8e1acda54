//! Use cases - User story orchestration.
//!
//! Use cases resolve ids against the registry and run the domain rules.

pub mod interaction;

pub use interaction::{DamageRoll, Interaction, InteractionService};
