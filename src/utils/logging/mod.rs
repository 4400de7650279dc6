//! Logging initialisation
//!
//! Builds the process-wide `tracing` subscriber from [`LoggingConfig`]. The
//! `RUST_LOG` environment variable, when set, overrides the configured level.

use crate::config::LoggingConfig;
use crate::utils::error::{DiagnosticsError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// Calling this more than once is harmless: the first subscriber wins and later
/// calls return `Ok(false)`.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(&config.level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_names(config.with_thread_names)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    Ok(installed)
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| DiagnosticsError::config(format!("Invalid log level '{}': {}", level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        // only meaningful when RUST_LOG is absent
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_filter("depscope=loudest").is_err());
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(!init_logging(&config).unwrap());
    }
}
