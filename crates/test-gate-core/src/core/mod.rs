// crates/test-gate-core/src/core/mod.rs
// ============================================================================
// Module: Test Gate Core Types
// Description: Data model for environments, tests, and decisions.
// Purpose: Group the immutable records shared by the runtime and filters.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! Core types are plain records. Environment profiles and test configuration
//! are created once per suite run and shared read-only; test descriptors and
//! decision reports live for a single test cycle.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod descriptor;
pub mod environment;
pub mod outcome;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use descriptor::Requirements;
pub use descriptor::SuiteId;
pub use descriptor::SuiteRef;
pub use descriptor::TestDescriptor;
pub use descriptor::TestId;
pub use descriptor::TestMetadata;
pub use environment::BuildInfo;
pub use environment::ConnectionString;
pub use environment::ConnectionStringError;
pub use environment::DEFAULT_DATABASE_NAME;
pub use environment::DEFAULT_DEPLOYMENT_URI;
pub use environment::DEFAULT_PORT;
pub use environment::EnvironmentProfile;
pub use environment::GateSettings;
pub use environment::HostAddress;
pub use environment::TestConfiguration;
pub use environment::TopologyKind;
pub use outcome::DecisionOutcome;
pub use outcome::DecisionReport;
pub use outcome::FilterRejection;
