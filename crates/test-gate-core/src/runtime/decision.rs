// crates/test-gate-core/src/runtime/decision.rs
// ============================================================================
// Module: Per-Test Decision Engine
// Description: Consults every registered filter for one test.
// Purpose: Aggregate filter verdicts into a single run/skip report.
// Dependencies: crate::core, crate::runtime::registry, tracing
// ============================================================================

//! ## Overview
//! A test runs only if every registered filter accepts it. Every filter is
//! consulted for every test; the tally must count exactly one verdict per
//! filter before a report is produced. A skipped test whose suite is not a
//! direct child of the root also requests fixture suppression for that
//! suite. A filter whose `decide` fails turns the cycle into a per-test
//! failure rather than a silent run or skip.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing::debug;

use crate::core::DecisionOutcome;
use crate::core::DecisionReport;
use crate::core::FilterRejection;
use crate::core::TestDescriptor;
use crate::core::TestId;
use crate::filter::FilterError;
use crate::runtime::FilterRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Per-test decision failures.
///
/// # Invariants
/// - Scoped to one test; the suite run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// A filter failed to render a decision.
    #[error("filter {filter} (index {index}) failed to decide test {test}: {source}")]
    Filter {
        /// Registration index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Test being decided.
        test: TestId,
        /// Reported failure.
        #[source]
        source: FilterError,
    },
    /// Fewer verdicts were counted than filters registered.
    ///
    /// Guard on the tally. [`DecisionEngine::evaluate`] records one verdict
    /// per registered filter, so it does not return this variant.
    #[error("decision incomplete: {consulted} of {expected} filters consulted")]
    Incomplete {
        /// Registered filters.
        expected: usize,
        /// Verdicts counted.
        consulted: usize,
    },
    /// More verdicts were counted than filters registered.
    ///
    /// Guard on the tally. [`DecisionEngine::evaluate`] iterates the registry
    /// exactly once, so it does not return this variant.
    #[error("decision overcounted: more than {expected} verdicts recorded")]
    Overcounted {
        /// Registered filters.
        expected: usize,
    },
}

// ============================================================================
// SECTION: Tally
// ============================================================================

/// Exact verdict counter for one test cycle.
#[derive(Debug)]
struct DecisionTally {
    /// Number of verdicts required.
    expected: usize,
    /// Number of verdicts recorded.
    consulted: usize,
    /// Rejections in registration order.
    rejections: Vec<FilterRejection>,
}

impl DecisionTally {
    /// Creates a tally expecting one verdict per filter.
    const fn new(expected: usize) -> Self {
        Self {
            expected,
            consulted: 0,
            rejections: Vec::new(),
        }
    }

    /// Records one verdict.
    fn record(&mut self, index: usize, filter: &str, accepted: bool) -> Result<(), DecisionError> {
        if self.consulted >= self.expected {
            return Err(DecisionError::Overcounted {
                expected: self.expected,
            });
        }
        self.consulted += 1;
        if !accepted {
            self.rejections.push(FilterRejection {
                index,
                filter: filter.to_string(),
            });
        }
        Ok(())
    }

    /// Produces the report once every verdict is counted.
    fn finish(self, test: &TestDescriptor) -> Result<DecisionReport, DecisionError> {
        if self.consulted != self.expected {
            return Err(DecisionError::Incomplete {
                expected: self.expected,
                consulted: self.consulted,
            });
        }
        let outcome =
            if self.rejections.is_empty() { DecisionOutcome::Run } else { DecisionOutcome::Skip };
        let suppress_fixtures = (outcome.is_skip() && !test.is_under_root_suite())
            .then(|| test.parent().id.clone());
        Ok(DecisionReport {
            outcome,
            consulted: self.consulted,
            rejections: self.rejections,
            suppress_fixtures,
        })
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Stateless per-test decision engine.
pub struct DecisionEngine;

impl DecisionEngine {
    /// Consults every filter in registration order and aggregates the result.
    ///
    /// With no filters registered the test runs.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when a filter fails to decide or the tally
    /// does not match the registry length.
    pub async fn evaluate(
        registry: &FilterRegistry,
        test: &TestDescriptor,
    ) -> Result<DecisionReport, DecisionError> {
        let mut tally = DecisionTally::new(registry.len());
        for (index, filter) in registry.iter().enumerate() {
            let accepted =
                filter.decide(test).await.map_err(|source| DecisionError::Filter {
                    index,
                    filter: filter.name().to_string(),
                    test: test.id().clone(),
                    source,
                })?;
            debug!(test = %test.id(), filter = filter.name(), accepted, "filter decision");
            tally.record(index, filter.name(), accepted)?;
        }
        tally.finish(test)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only assertions are permitted."
    )]

    use super::DecisionError;
    use super::DecisionTally;
    use crate::core::DecisionOutcome;
    use crate::core::SuiteRef;
    use crate::core::TestDescriptor;

    fn nested_test() -> TestDescriptor {
        TestDescriptor::new(
            "t1",
            "nested test",
            SuiteRef::nested("inner"),
            Some(SuiteRef::nested("outer")),
        )
    }

    #[test]
    fn tally_rejects_extra_verdicts() {
        let mut tally = DecisionTally::new(1);
        tally.record(0, "a", true).unwrap();
        let err = tally.record(1, "b", true).unwrap_err();
        assert_eq!(err, DecisionError::Overcounted { expected: 1 });
    }

    #[test]
    fn tally_refuses_to_finish_early() {
        let mut tally = DecisionTally::new(2);
        tally.record(0, "a", true).unwrap();
        let err = tally.finish(&nested_test()).unwrap_err();
        assert_eq!(err, DecisionError::Incomplete { expected: 2, consulted: 1 });
    }

    #[test]
    fn tally_requests_suppression_for_nested_skip() {
        let mut tally = DecisionTally::new(1);
        tally.record(0, "a", false).unwrap();
        let report = tally.finish(&nested_test()).unwrap();
        assert_eq!(report.outcome, DecisionOutcome::Skip);
        assert_eq!(report.suppress_fixtures.as_ref().map(|id| id.as_str()), Some("inner"));
    }

    #[test]
    fn empty_tally_runs() {
        let report = DecisionTally::new(0).finish(&nested_test()).unwrap();
        assert_eq!(report.outcome, DecisionOutcome::Run);
        assert_eq!(report.consulted, 0);
        assert!(report.suppress_fixtures.is_none());
    }
}
