// crates/test-gate-config/src/config.rs
// ============================================================================
// Module: Runner Configuration
// Description: Typed runner configuration with TOML and environment layers.
// Purpose: Provide strict, fail-closed runner settings with hard limits.
// Dependencies: serde, test-gate-core, toml
// ============================================================================

//! ## Overview
//! Values resolve in three layers: built-in defaults, then the optional TOML
//! file named by `TEST_GATE_CONFIG`, then individual environment variables.
//! The merged result is validated before it is returned.
//!
//! ```toml
//! [deployment]
//! uri = "service://db1:27017,db2:27018"
//! database = "integration_tests"
//!
//! [logging]
//! filter = "info,test_gate_core=debug"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use test_gate_core::ConnectionString;
use test_gate_core::DEFAULT_DATABASE_NAME;
use test_gate_core::DEFAULT_DEPLOYMENT_URI;
use test_gate_core::GateSettings;
use thiserror::Error;

use crate::env::EnvSource;
use crate::env::ProcessEnv;
use crate::env::RunnerEnv;
use crate::env::read_env_nonempty;
use crate::logging::parse_filter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default tracing filter directives.
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum database name length.
pub(crate) const MAX_DATABASE_NAME_LENGTH: usize = 64;

// ============================================================================
// SECTION: File Model
// ============================================================================

/// On-disk configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Deployment section.
    #[serde(default)]
    pub deployment: DeploymentSection,
    /// Logging section.
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[deployment]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentSection {
    /// Deployment connection string.
    pub uri: Option<String>,
    /// Database name used for profile-scoped URLs.
    pub database: Option<String>,
}

/// `[logging]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Tracing filter directives.
    pub filter: Option<String>,
}

impl FileConfig {
    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is out of bounds, the file cannot
    /// be read, exceeds the size limit, is not UTF-8, or is not valid TOML.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

// ============================================================================
// SECTION: Runner Config
// ============================================================================

/// Validated runner configuration.
///
/// # Invariants
/// - `deployment_uri` parses as a connection string with at least one host.
/// - `database_name` is non-empty and contains no `/`.
/// - `log_filter` parses as tracing filter directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Deployment connection string.
    deployment_uri: String,
    /// Database name.
    database_name: String,
    /// Tracing filter directives.
    log_filter: String,
    /// Configuration file the values were read from, if any.
    source: Option<PathBuf>,
}

impl RunnerConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ProcessEnv)
    }

    /// Loads configuration from the provided environment source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an environment value is invalid, the
    /// config file cannot be read, or the merged values fail validation.
    pub fn load_from(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        let path = read_env_nonempty(source, RunnerEnv::ConfigPath)?.map(PathBuf::from);
        let file = match &path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        let deployment_uri = read_env_nonempty(source, RunnerEnv::DeploymentUri)?
            .or(file.deployment.uri)
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT_URI.to_string());
        let database_name = read_env_nonempty(source, RunnerEnv::Database)?
            .or(file.deployment.database)
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        let log_filter = read_env_nonempty(source, RunnerEnv::LogFilter)?
            .or(file.logging.filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let config = Self {
            deployment_uri,
            database_name,
            log_filter,
            source: path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the merged values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConnectionString::parse(&self.deployment_uri)
            .map_err(|err| ConfigError::Invalid(format!("deployment.uri is invalid: {err}")))?;
        validate_database_name(&self.database_name)?;
        parse_filter(&self.log_filter)?;
        Ok(())
    }

    /// Returns the deployment connection string.
    #[must_use]
    pub fn deployment_uri(&self) -> &str {
        &self.deployment_uri
    }

    /// Returns the database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Returns the tracing filter directives.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configuration file path, if one was read.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Converts into core gate settings.
    #[must_use]
    pub fn into_settings(self) -> GateSettings {
        GateSettings {
            deployment_uri: self.deployment_uri,
            database_name: self.database_name,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            deployment_uri: DEFAULT_DEPLOYMENT_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            source: None,
        }
    }
}

impl From<RunnerConfig> for GateSettings {
    fn from(config: RunnerConfig) -> Self {
        config.into_settings()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("config env error: {0}")]
    Env(String),
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// The tracing subscriber could not be installed.
    #[error("logging init error: {0}")]
    Logging(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the config path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a database name.
fn validate_database_name(value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid("deployment.database must be non-empty".to_string()));
    }
    if value.len() > MAX_DATABASE_NAME_LENGTH {
        return Err(ConfigError::Invalid("deployment.database exceeds max length".to_string()));
    }
    if value.contains('/') {
        return Err(ConfigError::Invalid("deployment.database must not contain '/'".to_string()));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(
            "deployment.database must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}
