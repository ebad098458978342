// crates/test-gate-config/src/env_tests.rs
// ============================================================================
// Module: Runner Environment Tests
// Description: Unit tests for strict environment readers.
// Purpose: Ensure empty and non-UTF-8 values fail closed.
// Dependencies: test-gate-config env helpers
// ============================================================================

//! ## Overview
//! Exercises [`read_env_strict`] and [`read_env_nonempty`] against a fixed
//! [`MapEnv`] so no test mutates the process environment.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::config::ConfigError;
use crate::env::MapEnv;
use crate::env::RunnerEnv;
use crate::env::read_env_nonempty;
use crate::env::read_env_strict;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn env_keys_are_stable() {
    assert_eq!(RunnerEnv::DeploymentUri.as_str(), "TEST_GATE_DEPLOYMENT_URI");
    assert_eq!(RunnerEnv::Database.as_str(), "TEST_GATE_DATABASE");
    assert_eq!(RunnerEnv::ConfigPath.as_str(), "TEST_GATE_CONFIG");
    assert_eq!(RunnerEnv::LogFilter.as_str(), "TEST_GATE_LOG");
}

#[test]
fn unset_variable_reads_as_none() {
    let env = MapEnv::new();
    assert_eq!(read_env_strict(&env, RunnerEnv::Database).unwrap(), None);
    assert_eq!(read_env_nonempty(&env, RunnerEnv::Database).unwrap(), None);
}

#[test]
fn nonempty_reader_trims_values() {
    let env = MapEnv::new().with(RunnerEnv::Database, "  suites  ");
    assert_eq!(read_env_nonempty(&env, RunnerEnv::Database).unwrap().as_deref(), Some("suites"));
}

#[test]
fn whitespace_value_is_rejected() {
    let env = MapEnv::new().with(RunnerEnv::DeploymentUri, "   ");
    let err = read_env_nonempty(&env, RunnerEnv::DeploymentUri).unwrap_err();
    assert!(matches!(err, ConfigError::Env(_)));
    assert!(err.to_string().contains("TEST_GATE_DEPLOYMENT_URI must not be empty"));
}

#[cfg(unix)]
#[test]
fn non_utf8_value_is_rejected() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let env = MapEnv::new().with(RunnerEnv::Database, OsString::from_vec(vec![0x66, 0xFF, 0x6F]));
    let err = read_env_strict(&env, RunnerEnv::Database).unwrap_err();
    assert!(err.to_string().contains("TEST_GATE_DATABASE must be valid UTF-8"));
}
