//! Engine error types.
//!
//! Rules never fail; these cover the orchestration around them: ids that
//! resolve to nothing, snapshots that do not parse, settings that do not load.

use thiserror::Error;

use delve_domain::DomainError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An interaction named an entity the registry does not hold
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A link update points at something that is not registered
    #[error("Link target missing: {0}")]
    MissingLinkTarget(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

impl EngineError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}
