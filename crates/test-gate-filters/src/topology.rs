// crates/test-gate-filters/src/topology.rs
// ============================================================================
// Module: Topology Filter
// Description: Gates tests on the classified deployment topology.
// Purpose: Skip tests whose declared topologies exclude the runtime one.
// Dependencies: test-gate-core, tracing
// ============================================================================

//! ## Overview
//! [`TopologyFilter`] is built with the runtime topology and compares it to
//! each test's `requires.topology` list. An empty list accepts any topology.
//! An unrecognized runtime topology never gates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use test_gate_core::ConfigurationError;
use test_gate_core::Filter;
use test_gate_core::FilterError;
use test_gate_core::FilterLike;
use test_gate_core::FilterOptions;
use test_gate_core::FilterPlugin;
use test_gate_core::TestDescriptor;
use test_gate_core::TopologyKind;
use tracing::debug;

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Filter name reported in decision reports.
pub const TOPOLOGY_FILTER: &str = "topology";

/// Rejects tests that do not support the runtime topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyFilter {
    /// Classified runtime topology.
    runtime: TopologyKind,
}

impl TopologyFilter {
    /// Creates a filter for the runtime topology.
    #[must_use]
    pub const fn new(runtime: TopologyKind) -> Self {
        Self {
            runtime,
        }
    }

    /// Returns true when a test requiring `required` may run.
    #[must_use]
    pub fn accepts(&self, required: &[TopologyKind]) -> bool {
        required.is_empty() || !self.runtime.is_classified() || required.contains(&self.runtime)
    }
}

#[async_trait]
impl Filter for TopologyFilter {
    fn name(&self) -> &str {
        TOPOLOGY_FILTER
    }

    async fn decide(&self, test: &TestDescriptor) -> Result<bool, FilterError> {
        let required = &test.metadata().requires.topology;
        let accepted = self.accepts(required);
        if !accepted {
            debug!(test = %test.id(), runtime = %self.runtime, "topology not supported by test");
        }
        Ok(accepted)
    }
}

/// Plugin building a [`TopologyFilter`] from the runtime topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologyPlugin;

impl FilterPlugin for TopologyPlugin {
    fn name(&self) -> &str {
        TOPOLOGY_FILTER
    }

    fn build(&self, options: &FilterOptions) -> Result<FilterLike, ConfigurationError> {
        Ok(FilterLike::dynamic(TopologyFilter::new(options.runtime_topology)))
    }
}
