// crates/test-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Test Gate Runtime
// Description: Classification, filter coordination, and lifecycle binding.
// Purpose: Drive per-suite setup and per-test decisions.
// Dependencies: crate::core, crate::filter, crate::interfaces, tokio, tracing
// ============================================================================

//! ## Overview
//! The runtime is single-threaded and cooperative. One [`LifecycleBinder`]
//! owns one [`SuiteContext`] per suite run; per-test cycles never overlap.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classifier;
pub mod decision;
pub mod host;
pub mod initializer;
pub mod lifecycle;
pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classifier::EnvironmentClassifier;
pub use decision::DecisionEngine;
pub use decision::DecisionError;
pub use host::InMemorySuiteHost;
pub use initializer::FilterInitializer;
pub use initializer::InitializationError;
pub use lifecycle::HookError;
pub use lifecycle::LifecycleBinder;
pub use lifecycle::LifecycleState;
pub use lifecycle::SetupError;
pub use lifecycle::SuiteContext;
pub use lifecycle::TeardownError;
pub use registry::FilterRegistry;
