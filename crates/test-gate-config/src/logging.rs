// crates/test-gate-config/src/logging.rs
// ============================================================================
// Module: Runner Logging
// Description: Tracing subscriber setup from runner configuration.
// Purpose: Install one stderr subscriber filtered by configured directives.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Suite runners call [`init_tracing`] once before the first lifecycle hook.
//! Test output owns stdout, so events are written to stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ConfigError;
use crate::config::RunnerConfig;

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Parses tracing filter directives.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the directives do not parse.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(directives)
        .map_err(|err| ConfigError::Invalid(format!("logging.filter is invalid: {err}")))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`ConfigError::Logging`] when a global subscriber is already set,
/// or [`ConfigError::Invalid`] when the filter does not parse.
pub fn init_tracing(config: &RunnerConfig) -> Result<(), ConfigError> {
    let filter = parse_filter(config.log_filter())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ConfigError::Logging(err.to_string()))?;
    info!(filter = %config.log_filter(), "tracing initialized");
    Ok(())
}
