// crates/test-gate-core/src/runtime/host.rs
// ============================================================================
// Module: In-Memory Suite Host
// Description: Reference suite host that records lifecycle mutations.
// Purpose: Provide a deterministic host for tests and embedding examples.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemorySuiteHost`] keeps per-suite before-each hook names, the attached
//! configuration, and every skip and suppression the binder requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::SuiteId;
use crate::core::TestConfiguration;
use crate::core::TestId;
use crate::interfaces::SuiteHost;

// ============================================================================
// SECTION: Host
// ============================================================================

/// Suite host backed by in-memory collections.
#[derive(Debug, Default)]
pub struct InMemorySuiteHost {
    /// Configuration attached by the binder.
    configuration: Option<Arc<TestConfiguration>>,
    /// Before-each hook names per suite.
    before_each: BTreeMap<SuiteId, Vec<String>>,
    /// Suites whose hooks were cleared, in request order.
    cleared: Vec<SuiteId>,
    /// Skipped tests, in request order.
    skipped: Vec<TestId>,
}

impl InMemorySuiteHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares before-each hooks for a suite.
    #[must_use]
    pub fn with_before_each(mut self, suite: &str, hooks: &[&str]) -> Self {
        self.before_each
            .insert(SuiteId::new(suite), hooks.iter().map(|hook| (*hook).to_string()).collect());
        self
    }

    /// Returns the attached configuration.
    #[must_use]
    pub const fn configuration(&self) -> Option<&Arc<TestConfiguration>> {
        self.configuration.as_ref()
    }

    /// Returns the current before-each hooks of a suite.
    #[must_use]
    pub fn before_each_hooks(&self, suite: &str) -> &[String] {
        self.before_each.get(&SuiteId::new(suite)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns suites whose hooks were cleared.
    #[must_use]
    pub fn cleared(&self) -> &[SuiteId] {
        &self.cleared
    }

    /// Returns skipped tests.
    #[must_use]
    pub fn skipped(&self) -> &[TestId] {
        &self.skipped
    }

    /// Returns true when the test was skipped.
    #[must_use]
    pub fn is_skipped(&self, test: &str) -> bool {
        self.skipped.iter().any(|id| id.as_str() == test)
    }
}

impl SuiteHost for InMemorySuiteHost {
    fn attach_configuration(&mut self, configuration: Arc<TestConfiguration>) {
        self.configuration = Some(configuration);
    }

    fn clear_before_each(&mut self, suite: &SuiteId) {
        if let Some(hooks) = self.before_each.get_mut(suite) {
            hooks.clear();
        }
        self.cleared.push(suite.clone());
    }

    fn skip_test(&mut self, test: &TestId) {
        self.skipped.push(test.clone());
    }
}
