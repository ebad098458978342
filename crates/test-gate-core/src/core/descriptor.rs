// crates/test-gate-core/src/core/descriptor.rs
// ============================================================================
// Module: Test Descriptors
// Description: Identity, suite placement, and requirement metadata for tests.
// Purpose: Give filters a stable view of the test being decided.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestDescriptor`] is the core's view of a host engine test case. The
//! runtime reads only its identity, its parent suite, and the parent's
//! parent; filters additionally read [`TestMetadata`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::TopologyKind;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Opaque test identifier assigned by the host engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(String);

impl TestId {
    /// Creates a new test identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque suite identifier assigned by the host engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteId(String);

impl SuiteId {
    /// Creates a new suite identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a suite in the host engine tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteRef {
    /// Suite identifier.
    pub id: SuiteId,
    /// True for the root suite.
    pub is_root: bool,
}

impl SuiteRef {
    /// Creates a reference to the root suite.
    #[must_use]
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: SuiteId::new(id),
            is_root: true,
        }
    }

    /// Creates a reference to a non-root suite.
    #[must_use]
    pub fn nested(id: impl Into<String>) -> Self {
        Self {
            id: SuiteId::new(id),
            is_root: false,
        }
    }
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Environment requirements a test declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Requirements {
    /// Topologies the test supports; empty means any.
    pub topology: Vec<TopologyKind>,
    /// Server version range, e.g. `">=4.0 <5"`.
    pub version: Option<String>,
    /// Operating systems, e.g. `"linux,macos"` or `"!windows"`.
    pub os: Option<String>,
}

/// Metadata attached to a test by its author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestMetadata {
    /// Environment requirements.
    pub requires: Requirements,
}

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Test case as seen by filters and the decision engine.
///
/// # Invariants
/// - `grandparent` is `None` when `parent` is the root suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDescriptor {
    /// Test identifier.
    id: TestId,
    /// Human-readable title.
    title: String,
    /// Immediate parent suite.
    parent: SuiteRef,
    /// Parent of the parent suite.
    grandparent: Option<SuiteRef>,
    /// Author-provided metadata.
    metadata: TestMetadata,
}

impl TestDescriptor {
    /// Creates a descriptor with empty metadata.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        parent: SuiteRef,
        grandparent: Option<SuiteRef>,
    ) -> Self {
        Self {
            id: TestId::new(id),
            title: title.into(),
            parent,
            grandparent,
            metadata: TestMetadata::default(),
        }
    }

    /// Replaces the descriptor metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: TestMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the test identifier.
    #[must_use]
    pub const fn id(&self) -> &TestId {
        &self.id
    }

    /// Returns the test title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the immediate parent suite.
    #[must_use]
    pub const fn parent(&self) -> &SuiteRef {
        &self.parent
    }

    /// Returns the parent's parent suite.
    #[must_use]
    pub const fn grandparent(&self) -> Option<&SuiteRef> {
        self.grandparent.as_ref()
    }

    /// Returns the test metadata.
    #[must_use]
    pub const fn metadata(&self) -> &TestMetadata {
        &self.metadata
    }

    /// Returns true when the test's suite is the root or a direct child of it.
    #[must_use]
    pub fn is_under_root_suite(&self) -> bool {
        self.parent.is_root || self.grandparent.as_ref().is_none_or(|suite| suite.is_root)
    }
}
