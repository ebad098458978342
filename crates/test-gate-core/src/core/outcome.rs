// crates/test-gate-core/src/core/outcome.rs
// ============================================================================
// Module: Decision Outcomes
// Description: Per-test decision values produced by the decision engine.
// Purpose: Carry the run/skip verdict and its suppression side effect.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Decision values are ephemeral. The lifecycle binder consumes a
//! [`DecisionReport`] immediately to mutate host suite state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::SuiteId;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Binary per-test verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    /// Test body executes normally.
    Run,
    /// Test body is bypassed and reported as skipped.
    Skip,
}

impl DecisionOutcome {
    /// Returns true for [`DecisionOutcome::Skip`].
    #[must_use]
    pub const fn is_skip(self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// A filter that rejected the test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRejection {
    /// Registration index of the filter.
    pub index: usize,
    /// Filter name.
    pub filter: String,
}

/// Aggregated result of consulting every registered filter.
///
/// # Invariants
/// - `consulted` equals the registry length.
/// - `outcome` is `Skip` iff `rejections` is non-empty.
/// - `suppress_fixtures` is set only for skips outside root-level suites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionReport {
    /// Aggregate verdict.
    pub outcome: DecisionOutcome,
    /// Number of filters consulted.
    pub consulted: usize,
    /// Rejecting filters in registration order.
    pub rejections: Vec<FilterRejection>,
    /// Suite whose before-each hooks must be cleared for this cycle.
    pub suppress_fixtures: Option<SuiteId>,
}
