//! Engine settings loaded from the environment.
//!
//! # Environment Variables
//!
//! - `DELVE_DICE_SEED` - Seed for reproducible dice (default: unset, real randomness)
//! - `DELVE_LOG_FILTER` - Tracing filter used when `RUST_LOG` is unset
//!   (default: `delve_engine=debug,delve_domain=debug`)

use serde::Deserialize;

use crate::error::EngineError;

pub const DEFAULT_LOG_FILTER: &str = "delve_engine=debug,delve_domain=debug";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub dice_seed: Option<u64>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            dice_seed: None,
            log_filter: default_log_filter(),
        }
    }
}

impl EngineSettings {
    /// Load settings from `.env.local` / `.env` at the repo root, then from
    /// `DELVE_`-prefixed environment variables.
    pub fn load() -> Result<Self, EngineError> {
        load_dotenv_from_repo_root();
        Self::from_source(config::Environment::with_prefix("DELVE").try_parsing(true))
    }

    /// Build settings from any `config` source, over the defaults.
    pub fn from_source<S>(source: S) -> Result<Self, EngineError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        tracing::debug!(?settings, "Engine settings loaded");
        Ok(settings)
    }

    pub fn with_dice_seed(mut self, seed: u64) -> Self {
        self.dice_seed = Some(seed);
        self
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("DELVE")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = EngineSettings::from_source(env(&[])).expect("settings");
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let settings = EngineSettings::from_source(env(&[
            ("DELVE_DICE_SEED", "1234"),
            ("DELVE_LOG_FILTER", "delve_domain=info"),
        ]))
        .expect("settings");
        assert_eq!(settings.dice_seed, Some(1234));
        assert_eq!(settings.log_filter, "delve_domain=info");
    }

    #[test]
    fn malformed_seed_is_a_settings_error() {
        let err = EngineSettings::from_source(env(&[("DELVE_DICE_SEED", "lots")]))
            .expect_err("bad seed");
        assert!(matches!(err, EngineError::Settings(_)));
    }
}
