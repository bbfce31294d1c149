use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter. A second call keeps the first subscriber and returns
/// `false`.
pub fn setup_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Tracing subscriber already installed");
            false
        }
    }
}
