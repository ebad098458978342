// crates/test-gate-filters/src/catalog.rs
// ============================================================================
// Module: Built-In Catalog
// Description: Ordered catalog of the built-in filter plugins.
// Purpose: Give suite runners a ready-made plugin set.
// Dependencies: test-gate-core
// ============================================================================

//! ## Overview
//! Catalog order is registration order: topology, then server version, then
//! operating system.

// ============================================================================
// SECTION: Imports
// ============================================================================

use test_gate_core::FilterCatalog;

use crate::os::OsPlugin;
use crate::topology::TopologyPlugin;
use crate::version::ServerVersionPlugin;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the built-in plugins for the compile-target operating system.
#[must_use]
pub fn builtin_catalog() -> FilterCatalog {
    builtin_catalog_with(OsPlugin::new())
}

/// Returns the built-in plugins with an explicit OS plugin.
#[must_use]
pub fn builtin_catalog_with(os: OsPlugin) -> FilterCatalog {
    FilterCatalog::new().with(TopologyPlugin).with(ServerVersionPlugin).with(os)
}
