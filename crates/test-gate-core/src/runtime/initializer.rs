// crates/test-gate-core/src/runtime/initializer.rs
// ============================================================================
// Module: Filter Initialization Coordinator
// Description: Runs each filter's optional initializer exactly once.
// Purpose: Guarantee all filters are ready before any decision is consulted.
// Dependencies: crate::runtime::registry, tokio, tracing
// ============================================================================

//! ## Overview
//! Initialization is hoisted behind a [`OnceCell`]: the first per-test cycle
//! initializes every filter in registration order and later cycles observe
//! the ready cell. Every filter's `initialize` is called; the trait default
//! is a no-op. A failure poisons the coordinator; there is no retry and no
//! fallback to a partial filter set. A hung initializer hangs the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;
use tracing::info;

use crate::core::EnvironmentProfile;
use crate::filter::FilterError;
use crate::runtime::FilterRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Filter initialization failures.
///
/// # Invariants
/// - Fatal to the suite run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitializationError {
    /// A filter's initializer failed.
    #[error("filter {filter} (index {index}) failed to initialize: {source}")]
    Filter {
        /// Registration index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Reported failure.
        #[source]
        source: FilterError,
    },
    /// An earlier initialization attempt failed.
    #[error("filter initialization already failed for this environment")]
    Poisoned,
}

// ============================================================================
// SECTION: Coordinator
// ============================================================================

/// Once-per-environment initialization gate.
#[derive(Debug, Default)]
pub struct FilterInitializer {
    /// Set once every filter is ready.
    ready: OnceCell<()>,
    /// Set after a failed attempt.
    poisoned: AtomicBool,
}

impl FilterInitializer {
    /// Creates a coordinator with no filters initialized.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once every filter has initialized.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Initializes every filter on the first call; later calls return
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError`] when any initializer fails, or on any
    /// call after a failure.
    pub async fn ensure_ready(
        &self,
        registry: &FilterRegistry,
        profile: &Arc<EnvironmentProfile>,
    ) -> Result<(), InitializationError> {
        if self.poisoned.load(Ordering::Acquire) {
            return Err(InitializationError::Poisoned);
        }
        match self.ready.get_or_try_init(|| initialize_all(registry, profile)).await {
            Ok(_) => Ok(()),
            Err(err) => {
                self.poisoned.store(true, Ordering::Release);
                Err(err)
            }
        }
    }
}

/// Initializes filters sequentially in registration order.
async fn initialize_all(
    registry: &FilterRegistry,
    profile: &Arc<EnvironmentProfile>,
) -> Result<(), InitializationError> {
    for (index, filter) in registry.iter().enumerate() {
        filter.initialize(Arc::clone(profile)).await.map_err(|source| {
            InitializationError::Filter {
                index,
                filter: filter.name().to_string(),
                source,
            }
        })?;
        debug!(filter = filter.name(), index, "filter initialized");
    }
    info!(filters = registry.len(), "filters ready");
    Ok(())
}
