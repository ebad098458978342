// crates/test-gate-core/src/runtime/lifecycle.rs
// ============================================================================
// Module: Lifecycle Binder
// Description: Binds classification and decisions to suite lifecycle hooks.
// Purpose: Own the suite-run state machine, connection, and suite mutations.
// Dependencies: crate::core, crate::filter, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! [`LifecycleBinder`] exposes one method per host hook and walks the state
//! machine
//! `Uninitialized -> Connecting -> Classified -> (Evaluating -> Classified)*
//! -> Closing -> Closed`. Setup and initialization failures move it to
//! `Failed`, where only `after_each` and `after_all` are accepted.
//!
//! All per-run state lives in a [`SuiteContext`] built once in `before_all`.
//! The binder is the only component that mutates the host suite tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::core::DecisionReport;
use crate::core::EnvironmentProfile;
use crate::core::GateSettings;
use crate::core::SuiteId;
use crate::core::TestConfiguration;
use crate::core::TestDescriptor;
use crate::filter::ConfigurationError;
use crate::filter::FilterCatalog;
use crate::filter::FilterOptions;
use crate::interfaces::DeploymentConnection;
use crate::interfaces::DeploymentDriver;
use crate::interfaces::DriverError;
use crate::interfaces::FixtureReset;
use crate::interfaces::NoopDiagnostics;
use crate::interfaces::NoopFixtureReset;
use crate::interfaces::ResourceDiagnostics;
use crate::interfaces::SuiteHost;
use crate::runtime::DecisionEngine;
use crate::runtime::DecisionError;
use crate::runtime::EnvironmentClassifier;
use crate::runtime::FilterInitializer;
use crate::runtime::FilterRegistry;
use crate::runtime::InitializationError;

// ============================================================================
// SECTION: State
// ============================================================================

/// Suite-run lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No hook has run.
    Uninitialized,
    /// Opening the deployment connection.
    Connecting,
    /// Environment classified and filters registered.
    Classified,
    /// A per-test cycle is in flight.
    Evaluating,
    /// Closing the deployment connection.
    Closing,
    /// Connection closed; the run is over.
    Closed,
    /// Setup or initialization failed; no test may run.
    Failed,
}

impl LifecycleState {
    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Connecting => "connecting",
            Self::Classified => "classified",
            Self::Evaluating => "evaluating",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite setup failures; fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// `before_all` was called out of order.
    #[error("before_all requires state uninitialized, found {actual}")]
    InvalidState {
        /// State at the time of the call.
        actual: LifecycleState,
    },
    /// The deployment connection could not be opened.
    #[error("deployment connection failed: {0}")]
    Connect(#[source] DriverError),
    /// The build-info query failed.
    #[error("build info query failed: {0}")]
    BuildInfo(#[source] DriverError),
    /// The connection string could not be parsed.
    #[error("connection string parse failed: {0}")]
    ConnectionString(#[source] DriverError),
    /// Filter registration failed.
    #[error("filter registration failed: {0}")]
    Registry(#[from] ConfigurationError),
}

/// Per-test hook failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// A per-test hook was called out of order.
    #[error("{hook} is not valid in state {actual}")]
    InvalidState {
        /// Hook name.
        hook: &'static str,
        /// State at the time of the call.
        actual: LifecycleState,
    },
    /// Filter initialization failed; fatal to the run.
    #[error(transparent)]
    Initialization(#[from] InitializationError),
    /// A filter failed to decide; fatal to the test only.
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

/// Suite teardown failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeardownError {
    /// `after_all` was called out of order.
    #[error("after_all is not valid in state {actual}")]
    InvalidState {
        /// State at the time of the call.
        actual: LifecycleState,
    },
    /// The deployment connection did not close cleanly.
    #[error("deployment connection close failed: {0}")]
    Close(#[source] DriverError),
}

// ============================================================================
// SECTION: Suite Context
// ============================================================================

/// Per-run state shared by every hook.
///
/// # Invariants
/// - Built only after the connection is open and classified.
/// - The profile and registry never change after construction.
pub struct SuiteContext {
    /// The single process-wide deployment connection.
    connection: Arc<dyn DeploymentConnection>,
    /// Classified environment.
    profile: Arc<EnvironmentProfile>,
    /// Filters registered for the environment.
    registry: FilterRegistry,
    /// Once-per-environment initialization gate.
    initializer: FilterInitializer,
    /// Configuration attached to every test.
    configuration: Arc<TestConfiguration>,
}

impl SuiteContext {
    /// Returns the classified environment.
    #[must_use]
    pub const fn profile(&self) -> &Arc<EnvironmentProfile> {
        &self.profile
    }

    /// Returns the registered filters.
    #[must_use]
    pub const fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Returns the initialization coordinator.
    #[must_use]
    pub const fn initializer(&self) -> &FilterInitializer {
        &self.initializer
    }

    /// Returns the test configuration.
    #[must_use]
    pub const fn configuration(&self) -> &Arc<TestConfiguration> {
        &self.configuration
    }

    /// Ensures filters are ready, then decides the test.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] when initialization or a decision fails.
    pub async fn evaluate(&self, test: &TestDescriptor) -> Result<DecisionReport, HookError> {
        self.initializer.ensure_ready(&self.registry, &self.profile).await?;
        Ok(DecisionEngine::evaluate(&self.registry, test).await?)
    }
}

// ============================================================================
// SECTION: Binder
// ============================================================================

/// Hook-level driver for one suite run.
pub struct LifecycleBinder {
    /// Injected deployment driver.
    driver: Arc<dyn DeploymentDriver>,
    /// Filter plugins registered after classification.
    catalog: FilterCatalog,
    /// Deployment settings.
    settings: GateSettings,
    /// Per-test fixture cleanup.
    fixtures: Arc<dyn FixtureReset>,
    /// Leak diagnostics dumped at run end.
    diagnostics: Arc<dyn ResourceDiagnostics>,
    /// Current lifecycle state.
    state: LifecycleState,
    /// Per-run context, present from `Classified` until `Closing`.
    context: Option<SuiteContext>,
}

impl LifecycleBinder {
    /// Creates a binder with no-op fixture reset and diagnostics.
    #[must_use]
    pub fn new(
        driver: Arc<dyn DeploymentDriver>,
        catalog: FilterCatalog,
        settings: GateSettings,
    ) -> Self {
        Self {
            driver,
            catalog,
            settings,
            fixtures: Arc::new(NoopFixtureReset),
            diagnostics: Arc::new(NoopDiagnostics),
            state: LifecycleState::Uninitialized,
            context: None,
        }
    }

    /// Sets the per-test fixture cleanup.
    #[must_use]
    pub fn with_fixture_reset(mut self, fixtures: Arc<dyn FixtureReset>) -> Self {
        self.fixtures = fixtures;
        self
    }

    /// Sets the run-end diagnostics source.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn ResourceDiagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the per-run context once classified.
    #[must_use]
    pub const fn context(&self) -> Option<&SuiteContext> {
        self.context.as_ref()
    }

    /// Before-all hook: connect, classify, register filters, and attach the
    /// test configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] on any failure; the binder moves to `Failed`.
    pub async fn before_all(
        &mut self,
        host: &mut dyn SuiteHost,
    ) -> Result<Arc<TestConfiguration>, SetupError> {
        if self.state != LifecycleState::Uninitialized {
            return Err(SetupError::InvalidState {
                actual: self.state,
            });
        }
        self.state = LifecycleState::Connecting;
        match self.establish().await {
            Ok(context) => {
                let configuration = Arc::clone(&context.configuration);
                host.attach_configuration(Arc::clone(&configuration));
                self.context = Some(context);
                self.state = LifecycleState::Classified;
                Ok(configuration)
            }
            Err(err) => {
                error!(error = %err, "suite setup failed");
                self.state = LifecycleState::Failed;
                Err(err)
            }
        }
    }

    /// Before-each hook: initialize filters once, decide the test, and apply
    /// the outcome to the host.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] when called out of order, when initialization
    /// fails (the binder moves to `Failed`), or when a filter cannot decide.
    pub async fn before_each(
        &mut self,
        test: &TestDescriptor,
        host: &mut dyn SuiteHost,
    ) -> Result<DecisionReport, HookError> {
        let classified = self.state == LifecycleState::Classified;
        let Some(context) = self.context.as_ref().filter(|_| classified) else {
            return Err(HookError::InvalidState {
                hook: "before_each",
                actual: self.state,
            });
        };
        self.state = LifecycleState::Evaluating;
        let report = match context.evaluate(test).await {
            Ok(report) => report,
            Err(err @ HookError::Initialization(_)) => {
                error!(test = %test.id(), error = %err, "filter initialization failed");
                self.state = LifecycleState::Failed;
                return Err(err);
            }
            Err(err) => {
                warn!(test = %test.id(), error = %err, "filter decision failed");
                return Err(err);
            }
        };
        if report.outcome.is_skip() {
            if let Some(suite) = &report.suppress_fixtures {
                Self::suppress_suite_fixtures(host, suite);
            }
            info!(test = %test.id(), rejections = report.rejections.len(), "test skipped");
            host.skip_test(test.id());
        }
        Ok(report)
    }

    /// After-each hook: release fixture state left by the test.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidState`] outside a classified run.
    pub fn after_each(&mut self) -> Result<(), HookError> {
        match self.state {
            LifecycleState::Classified | LifecycleState::Evaluating => {
                self.fixtures.reset();
                self.state = LifecycleState::Classified;
                Ok(())
            }
            LifecycleState::Failed => {
                self.fixtures.reset();
                Ok(())
            }
            actual => Err(HookError::InvalidState {
                hook: "after_each",
                actual,
            }),
        }
    }

    /// After-all hook: close the connection and dump leak diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`TeardownError`] when called out of order or when the
    /// connection does not close cleanly. The binder is `Closed` either way
    /// once teardown starts.
    pub async fn after_all(&mut self) -> Result<(), TeardownError> {
        if !matches!(self.state, LifecycleState::Classified | LifecycleState::Failed) {
            return Err(TeardownError::InvalidState {
                actual: self.state,
            });
        }
        self.state = LifecycleState::Closing;
        let closed = match self.context.take() {
            Some(context) => context.connection.close().await,
            None => Ok(()),
        };
        self.dump_diagnostics();
        self.state = LifecycleState::Closed;
        closed.map_err(TeardownError::Close)?;
        info!("deployment connection closed");
        Ok(())
    }

    /// Opens the connection and builds the per-run context.
    async fn establish(&self) -> Result<SuiteContext, SetupError> {
        info!("connecting to deployment");
        let connection =
            self.driver.connect(&self.settings.deployment_uri).await.map_err(SetupError::Connect)?;
        match self.build_context(Arc::clone(&connection)).await {
            Ok(context) => Ok(context),
            Err(err) => {
                if let Err(close_err) = connection.close().await {
                    warn!(error = %close_err, "failed to close connection after setup failure");
                }
                Err(err)
            }
        }
    }

    /// Classifies the deployment and registers the catalog's filters.
    async fn build_context(
        &self,
        connection: Arc<dyn DeploymentConnection>,
    ) -> Result<SuiteContext, SetupError> {
        let classifier = EnvironmentClassifier::new(self.driver.as_ref(), &self.settings);
        let profile = Arc::new(classifier.classify(connection.as_ref()).await?);
        let options = FilterOptions {
            runtime_topology: profile.kind(),
        };
        let registry = FilterRegistry::from_catalog(&self.catalog, &options)?;
        info!(
            filters = registry.len(),
            runtime_topology = %options.runtime_topology,
            "filters registered"
        );
        let configuration =
            Arc::new(TestConfiguration::new(Arc::clone(&profile), self.settings.clone()));
        Ok(SuiteContext {
            connection,
            profile,
            registry,
            initializer: FilterInitializer::new(),
            configuration,
        })
    }

    /// Clears a suite's before-each hooks for the current cycle.
    fn suppress_suite_fixtures(host: &mut dyn SuiteHost, suite: &SuiteId) {
        debug!(suite = %suite, "suppressing suite before-each hooks");
        host.clear_before_each(suite);
    }

    /// Logs every handle still open at run end.
    fn dump_diagnostics(&self) {
        let handles = self.diagnostics.open_handles();
        for handle in &handles {
            warn!(handle = %handle, "handle still open at suite end");
        }
        info!(open_handles = handles.len(), "resource dump complete");
    }
}
