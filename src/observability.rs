//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Service name recorded on the startup event
    pub service_name: String,
    /// Log level filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "auth-service".to_string(),
            log_level: "info".to_string(),
            json_output: true,
        }
    }
}

impl TracingConfig {
    /// Derive tracing settings from the service configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .with_log_level(config.log_level.clone())
            .with_json_output(config.log_json)
    }

    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Toggle JSON output.
    #[must_use]
    pub const fn with_json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// Sets the global subscriber, so call it once at startup.
pub fn init_tracing(config: &TracingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(service = %config.service_name, "Tracing initialized");
}
