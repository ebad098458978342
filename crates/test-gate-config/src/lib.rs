// crates/test-gate-config/src/lib.rs
// ============================================================================
// Module: Test Gate Config
// Description: Runner configuration for environment-gated test suites.
// Purpose: Resolve deployment settings and logging from env and TOML.
// Dependencies: serde, test-gate-core, thiserror, toml, tracing-subscriber
// ============================================================================

//! ## Overview
//! [`RunnerConfig`] resolves the deployment connection string, the database
//! name, and tracing filter directives, then converts into the core
//! [`test_gate_core::GateSettings`]. Loading is strict: invalid UTF-8, empty
//! values, oversized files, and unknown TOML keys all fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;
#[cfg(test)]
mod env_tests;
pub mod logging;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DEFAULT_LOG_FILTER;
pub use config::DeploymentSection;
pub use config::FileConfig;
pub use config::LoggingSection;
pub use config::RunnerConfig;
pub use env::EnvSource;
pub use env::MapEnv;
pub use env::ProcessEnv;
pub use env::RunnerEnv;
pub use env::read_env_nonempty;
pub use env::read_env_strict;
pub use logging::init_tracing;
pub use logging::parse_filter;
