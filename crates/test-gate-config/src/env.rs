// crates/test-gate-config/src/env.rs
// ============================================================================
// Module: Runner Environment
// Description: Environment keys and strict readers for runner configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are read through an [`EnvSource`] so loaders can run
//! against the process environment or a fixed map. Invalid UTF-8 and empty
//! values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEnv {
    /// Deployment connection string override.
    DeploymentUri,
    /// Database name override.
    Database,
    /// Optional TOML configuration file path.
    ConfigPath,
    /// Optional tracing filter directive override.
    LogFilter,
}

impl RunnerEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeploymentUri => "TEST_GATE_DEPLOYMENT_URI",
            Self::Database => "TEST_GATE_DATABASE",
            Self::ConfigPath => "TEST_GATE_CONFIG",
            Self::LogFilter => "TEST_GATE_LOG",
        }
    }
}

// ============================================================================
// SECTION: Sources
// ============================================================================

/// Read access to environment variables.
pub trait EnvSource {
    /// Returns the raw value of a variable, if set.
    fn var_os(&self, name: &str) -> Option<OsString>;
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }
}

/// Fixed environment backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    /// Variables by name.
    vars: BTreeMap<String, OsString>,
}

impl MapEnv {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable.
    #[must_use]
    pub fn with(mut self, key: RunnerEnv, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.as_str().to_string(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var_os(&self, name: &str) -> Option<OsString> {
        self.vars.get(name).cloned()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the value contains invalid UTF-8.
pub fn read_env_strict(
    source: &dyn EnvSource,
    key: RunnerEnv,
) -> Result<Option<String>, ConfigError> {
    let name = key.as_str();
    source.var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable is set but empty or
/// whitespace, or is not valid UTF-8.
pub fn read_env_nonempty(
    source: &dyn EnvSource,
    key: RunnerEnv,
) -> Result<Option<String>, ConfigError> {
    match read_env_strict(source, key)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{} must not be empty", key.as_str())))
        }
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

