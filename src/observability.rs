//! Structured logging configuration.
//!
//! Sets up the `tracing` subscriber used by the `codemap` binary. Library
//! code only emits events; installing a subscriber is the caller's choice.

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

/// Valid log levels, lowest to highest severity.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Tracing configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// Validate the log level.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is not one of [`LOG_LEVELS`].
    pub fn validate(&self) -> crate::Result<()> {
        if LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            Ok(())
        } else {
            Err(crate::Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.level,
                LOG_LEVELS.join(", ")
            )))
        }
    }
}

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so stdout stays free for the code map path.
///
/// # Panics
///
/// Panics if a tracing subscriber has already been initialized in this process.
pub fn init_tracing(config: &TracingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default().with(env_filter).with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);

        Registry::default().with(env_filter).with(fmt_layer).init();
    }

    tracing::debug!(level = %config.level, json = config.json, "Tracing initialized");
}
