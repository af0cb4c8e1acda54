//! In-memory state storage modules.
//!
//! - `InteractionRegistry` - every lock, trap, device, door, puzzle and challenge in play

pub mod registry;

pub use registry::{InteractionRegistry, LinkReport, PuzzleReaction};
