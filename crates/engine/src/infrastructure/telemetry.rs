//! Tracing setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::settings::EngineSettings;

/// Install the global subscriber: `RUST_LOG` if set, otherwise the filter
/// from settings. Returns `false` when a subscriber was already installed.
pub fn init_tracing(settings: &EngineSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let settings = EngineSettings::default();
        init_tracing(&settings);
        assert!(!init_tracing(&settings));
    }
}
