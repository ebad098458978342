// crates/test-gate-filters/src/lib.rs
// ============================================================================
// Module: Test Gate Filters
// Description: Built-in filter plugins reading per-test requirements.
// Purpose: Gate tests on topology, server version, and host OS.
// Dependencies: async-trait, test-gate-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! Each plugin reads one field of a test's `requires` metadata and accepts
//! the test when the field is absent. [`builtin_catalog`] returns all of them
//! in registration order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod os;
pub mod topology;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::builtin_catalog;
pub use catalog::builtin_catalog_with;
pub use os::OS_FILTER;
pub use os::OsFilter;
pub use os::OsPlugin;
pub use os::OsRequirement;
pub use os::OsRequirementError;
pub use topology::TOPOLOGY_FILTER;
pub use topology::TopologyFilter;
pub use topology::TopologyPlugin;
pub use version::SERVER_VERSION_FILTER;
pub use version::ServerVersion;
pub use version::ServerVersionFilter;
pub use version::ServerVersionPlugin;
pub use version::VersionError;
pub use version::VersionRange;

#[cfg(test)]
mod tests;
