//! Tracing subscriber setup
//!
//! Output style follows the deployment environment: readable text locally,
//! JSON lines in dev and prod.

use crate::config::{Environment, LoggingConfig};
use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive when neither `RUST_LOG` nor the config sets one
pub fn default_level(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "debug",
        Environment::Prod => "info",
    }
}

/// Build the filter: `RUST_LOG` → configured level → environment default
pub fn build_filter(env: Environment, logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = logging
        .level
        .as_deref()
        .unwrap_or_else(|| default_level(env));

    EnvFilter::try_new(directive)
        .map_err(|e| Error::Config(format!("invalid log level '{}': {}", directive, e)))
}

/// Install the global tracing subscriber
pub fn init_logging(env: Environment, logging: &LoggingConfig) -> Result<()> {
    let filter = build_filter(env, logging)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match env {
        Environment::Local => builder.with_target(true).try_init(),
        Environment::Dev | Environment::Prod => builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
    };

    installed.map_err(|e| Error::Internal(format!("failed to install tracing subscriber: {}", e)))
}
