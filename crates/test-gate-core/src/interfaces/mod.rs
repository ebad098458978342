// crates/test-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Test Gate Interfaces
// Description: Contracts for the deployment driver and the host suite engine.
// Purpose: Define the seams the runtime uses to reach external collaborators.
// Dependencies: async-trait, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The deployment driver is injected into the runtime at construction time;
//! the runtime never searches for it. The host suite engine is reached only
//! through [`SuiteHost`], which the lifecycle binder alone mutates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::BuildInfo;
use crate::core::ConnectionString;
use crate::core::ConnectionStringError;
use crate::core::SuiteId;
use crate::core::TestConfiguration;
use crate::core::TestId;

// ============================================================================
// SECTION: Deployment Driver
// ============================================================================

/// Deployment driver errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Connection could not be opened.
    #[error("deployment connection failed: {0}")]
    Connect(String),
    /// Administrative command failed.
    #[error("deployment command failed: {0}")]
    Command(String),
    /// Connection string did not parse.
    #[error(transparent)]
    ConnectionString(#[from] ConnectionStringError),
    /// Connection could not be closed cleanly.
    #[error("deployment close failed: {0}")]
    Close(String),
}

/// Driver used to reach the target deployment.
#[async_trait]
pub trait DeploymentDriver: Send + Sync {
    /// Opens a connection to the deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the connection cannot be opened.
    async fn connect(&self, uri: &str) -> Result<Arc<dyn DeploymentConnection>, DriverError>;

    /// Parses a connection string into its host list.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the string does not parse.
    async fn parse_connection_string(&self, uri: &str) -> Result<ConnectionString, DriverError> {
        Ok(ConnectionString::parse(uri)?)
    }
}

/// Open connection to the deployment.
#[async_trait]
pub trait DeploymentConnection: Send + Sync {
    /// Runs the administrative build-info query.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the query fails.
    async fn build_info(&self) -> Result<BuildInfo, DriverError>;

    /// Returns the topology label discovered by the driver.
    fn topology_label(&self) -> String;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] when the connection cannot be closed cleanly.
    async fn close(&self) -> Result<(), DriverError>;
}

// ============================================================================
// SECTION: Host Suite Engine
// ============================================================================

/// Mutation surface of the hosting suite-execution engine.
pub trait SuiteHost: Send {
    /// Exposes the run configuration to every test context.
    fn attach_configuration(&mut self, configuration: Arc<TestConfiguration>);

    /// Clears the suite's before-each hooks for the current cycle.
    fn clear_before_each(&mut self, suite: &SuiteId);

    /// Marks the test skipped; the engine bypasses its body without failure.
    fn skip_test(&mut self, test: &TestId);
}

// ============================================================================
// SECTION: Fixtures and Diagnostics
// ============================================================================

/// Per-test cleanup of mock and fixture state owned outside the core.
pub trait FixtureReset: Send + Sync {
    /// Releases fixture state left by the previous test.
    fn reset(&self);
}

/// Fixture reset that does nothing.
pub struct NoopFixtureReset;

impl FixtureReset for NoopFixtureReset {
    fn reset(&self) {}
}

/// Leak diagnostics dumped when the suite ends.
pub trait ResourceDiagnostics: Send + Sync {
    /// Describes asynchronous handles that are still open.
    fn open_handles(&self) -> Vec<String>;
}

/// Diagnostics source that reports no handles.
pub struct NoopDiagnostics;

impl ResourceDiagnostics for NoopDiagnostics {
    fn open_handles(&self) -> Vec<String> {
        Vec::new()
    }
}
