// crates/test-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Filter Registry
// Description: Ordered, append-only store of normalized filters.
// Purpose: Validate registrations and preserve registration order.
// Dependencies: crate::filter, tracing
// ============================================================================

//! ## Overview
//! The registry validates each [`FilterLike`] and stores the normalized
//! filter. Registration order is initialization order and evaluation order.
//! Filters are never removed, reordered, or deduplicated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::debug;

use crate::filter::ConfigurationError;
use crate::filter::Filter;
use crate::filter::FilterCatalog;
use crate::filter::FilterLike;
use crate::filter::FilterOptions;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered filter sequence for one suite run.
///
/// # Invariants
/// - Append-only; registration order is preserved.
/// - Every entry satisfies the [`Filter`] interface.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    /// Normalized filters in registration order.
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every plugin in the catalog, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when a plugin fails to build or yields
    /// an invalid filter.
    pub fn from_catalog(
        catalog: &FilterCatalog,
        options: &FilterOptions,
    ) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for plugin in catalog.iter() {
            registry.register(plugin.build(options)?)?;
        }
        Ok(registry)
    }

    /// Validates, normalizes, and appends a filter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the value is not a function or an
    /// object, or when an object lacks `decide`.
    pub fn register(&mut self, filter: FilterLike) -> Result<(), ConfigurationError> {
        let filter = filter.normalize()?;
        debug!(filter = filter.name(), index = self.filters.len(), "filter registered");
        self.filters.push(filter);
        Ok(())
    }

    /// Returns the number of registered filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true when no filters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates filters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Filter>> {
        self.filters.iter()
    }

    /// Returns filter names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }
}
