//! Logging setup for hosts embedding the navigator
//!
//! All crates of the workspace log through `tracing`. Hosts call [`init`]
//! once at startup; the filter follows `RUST_LOG` syntax and falls back to
//! the configured default when the environment variable is not set.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive, used when `RUST_LOG` is unset
    pub filter: String,
    /// Include the event target (module path)
    pub with_target: bool,
    /// Use ANSI colors
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: "info".to_string(), with_target: true, with_ansi: true }
    }
}

impl LogConfig {
    /// Create a configuration with a default filter directive
    pub fn new(filter: impl Into<String>) -> Self {
        Self { filter: filter.into(), ..Default::default() }
    }

    /// Set whether the target is printed
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    /// Set whether ANSI colors are used
    pub fn with_ansi(mut self, with_ansi: bool) -> Self {
        self.with_ansi = with_ansi;
        self
    }

    /// Filter built from `RUST_LOG`, else from the default directive
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber
///
/// Fails when a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), TryInitError> {
    let layer = fmt::layer().with_target(config.with_target).with_ansi(config.with_ansi);
    tracing_subscriber::registry().with(config.env_filter()).with(layer).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = LogConfig::new("view_controllers=debug").with_target(false).with_ansi(false);
        assert_eq!(config.filter, "view_controllers=debug");
        assert!(!config.with_target);
        assert!(!config.with_ansi);
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::default().with_ansi(false);
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
