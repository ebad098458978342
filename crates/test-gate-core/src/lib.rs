// crates/test-gate-core/src/lib.rs
// ============================================================================
// Module: Test Gate Core
// Description: Environment-gated test selection for integration suites.
// Purpose: Classify the live deployment and decide per test whether it runs.
// Dependencies: async-trait, serde, thiserror, tokio, tracing, url
// ============================================================================

//! ## Overview
//! Test Gate plugs decision logic into the lifecycle hooks of an existing
//! suite-execution engine. Before any test runs it opens one deployment
//! connection, classifies the deployment into an [`EnvironmentProfile`], and
//! builds an ordered [`FilterRegistry`] from a [`FilterCatalog`]. Before each
//! test it initializes every filter once and asks every filter whether the
//! test should run; a single rejection skips the test.
//!
//! Invariants:
//! - Filters are normalized into one [`Filter`] interface at registration.
//! - Registration order defines initialization and evaluation order.
//! - Filter initialization runs at most once per [`SuiteContext`].
//! - Suite-tree mutation happens only through [`LifecycleBinder`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod filter;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::BuildInfo;
pub use crate::core::ConnectionString;
pub use crate::core::ConnectionStringError;
pub use crate::core::DEFAULT_DATABASE_NAME;
pub use crate::core::DEFAULT_DEPLOYMENT_URI;
pub use crate::core::DEFAULT_PORT;
pub use crate::core::DecisionOutcome;
pub use crate::core::DecisionReport;
pub use crate::core::EnvironmentProfile;
pub use crate::core::FilterRejection;
pub use crate::core::GateSettings;
pub use crate::core::HostAddress;
pub use crate::core::Requirements;
pub use crate::core::SuiteId;
pub use crate::core::SuiteRef;
pub use crate::core::TestConfiguration;
pub use crate::core::TestDescriptor;
pub use crate::core::TestId;
pub use crate::core::TestMetadata;
pub use crate::core::TopologyKind;
pub use crate::filter::ConfigurationError;
pub use crate::filter::DecideFn;
pub use crate::filter::Filter;
pub use crate::filter::FilterCatalog;
pub use crate::filter::FilterError;
pub use crate::filter::FilterLike;
pub use crate::filter::FilterObject;
pub use crate::filter::FilterOptions;
pub use crate::filter::FilterPlugin;
pub use crate::filter::InitializeFn;
pub use crate::filter::InitializeFuture;
pub use crate::interfaces::DeploymentConnection;
pub use crate::interfaces::DeploymentDriver;
pub use crate::interfaces::DriverError;
pub use crate::interfaces::FixtureReset;
pub use crate::interfaces::NoopDiagnostics;
pub use crate::interfaces::NoopFixtureReset;
pub use crate::interfaces::ResourceDiagnostics;
pub use crate::interfaces::SuiteHost;
pub use crate::runtime::DecisionEngine;
pub use crate::runtime::DecisionError;
pub use crate::runtime::EnvironmentClassifier;
pub use crate::runtime::FilterInitializer;
pub use crate::runtime::FilterRegistry;
pub use crate::runtime::HookError;
pub use crate::runtime::InMemorySuiteHost;
pub use crate::runtime::InitializationError;
pub use crate::runtime::LifecycleBinder;
pub use crate::runtime::LifecycleState;
pub use crate::runtime::SetupError;
pub use crate::runtime::SuiteContext;
pub use crate::runtime::TeardownError;
