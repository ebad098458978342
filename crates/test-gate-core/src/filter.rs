// crates/test-gate-core/src/filter.rs
// ============================================================================
// Module: Filter Contract
// Description: Filter capability interface, registration shapes, and plugins.
// Purpose: Define the one canonical filter interface and its admissible inputs.
// Dependencies: async-trait, thiserror
// ============================================================================

//! ## Overview
//! A filter decides whether a test should run against the classified
//! environment. Callers may hand the registry a bare predicate, a member
//! table with an optional `initialize` and a required `decide`, or a type
//! implementing [`Filter`] directly. [`FilterLike`] tags those shapes; the
//! registry normalizes every shape into `Arc<dyn Filter>` so nothing
//! downstream branches on shape again.
//!
//! Plugins ([`FilterPlugin`]) are constructed with the runtime topology and
//! collected in a [`FilterCatalog`]. Every plugin in a catalog is registered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::EnvironmentProfile;
use crate::core::TestDescriptor;
use crate::core::TopologyKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invalid filter registration.
///
/// # Invariants
/// - Raised synchronously; fatal to suite start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The value offered for registration is neither a function nor an object.
    #[error("type of filter must either be a function or an object, got {type_name}")]
    UnsupportedShape {
        /// Type name of the rejected value.
        type_name: String,
    },
    /// An object filter has no `decide` member.
    #[error("object filter {filter} must have a decide function")]
    MissingDecide {
        /// Filter name.
        filter: String,
    },
    /// A plugin could not build its filter.
    #[error("filter plugin {plugin} failed to build: {reason}")]
    Plugin {
        /// Plugin name.
        plugin: String,
        /// Failure reason.
        reason: String,
    },
}

/// Errors reported by filter implementations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Asynchronous initialization failed.
    #[error("filter initialization failed: {0}")]
    Initialize(String),
    /// The filter could not render a decision.
    #[error("filter decision failed: {0}")]
    Decide(String),
}

// ============================================================================
// SECTION: Filter Interface
// ============================================================================

/// Canonical filter capability interface.
#[async_trait]
pub trait Filter: Send + Sync {
    /// Returns a name used in logs and decision reports.
    fn name(&self) -> &str;

    /// Prepares the filter for the classified environment.
    ///
    /// Called once per classification, before any decision. The default
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the filter cannot be prepared.
    async fn initialize(&self, _profile: Arc<EnvironmentProfile>) -> Result<(), FilterError> {
        Ok(())
    }

    /// Returns true when the test should run.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when no decision can be rendered.
    async fn decide(&self, test: &TestDescriptor) -> Result<bool, FilterError>;
}

// ============================================================================
// SECTION: Registration Shapes
// ============================================================================

/// Boxed future returned by member-table initializers.
pub type InitializeFuture = Pin<Box<dyn Future<Output = Result<(), FilterError>> + Send>>;

/// Member-table initializer.
pub type InitializeFn = Arc<dyn Fn(Arc<EnvironmentProfile>) -> InitializeFuture + Send + Sync>;

/// Synchronous decision function.
pub type DecideFn = Arc<dyn Fn(&TestDescriptor) -> bool + Send + Sync>;

/// Member table describing an object-shaped filter.
///
/// # Invariants
/// - Registration fails unless `decide` is present.
#[derive(Clone)]
pub struct FilterObject {
    /// Filter name.
    name: String,
    /// Optional initializer.
    initialize: Option<InitializeFn>,
    /// Decision member.
    decide: Option<DecideFn>,
}

impl FilterObject {
    /// Creates an empty member table.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initialize: None,
            decide: None,
        }
    }

    /// Sets the decision member.
    #[must_use]
    pub fn with_decide(
        mut self,
        decide: impl Fn(&TestDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.decide = Some(Arc::new(decide));
        self
    }

    /// Sets the initializer member.
    #[must_use]
    pub fn with_initialize<F, Fut>(mut self, initialize: F) -> Self
    where
        F: Fn(Arc<EnvironmentProfile>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), FilterError>> + Send + 'static,
    {
        self.initialize = Some(Arc::new(move |profile| -> InitializeFuture {
            Box::pin(initialize(profile))
        }));
        self
    }

    /// Returns the filter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Any value offered for registration.
pub enum FilterLike {
    /// Bare decision function.
    Predicate {
        /// Filter name.
        name: String,
        /// Decision function.
        decide: DecideFn,
    },
    /// Member table.
    Object(FilterObject),
    /// Type implementing [`Filter`] directly.
    Dynamic(Arc<dyn Filter>),
    /// Value with no filter capability, reported by plugin adapters.
    Unsupported {
        /// Type name of the value.
        type_name: String,
    },
}

impl FilterLike {
    /// Wraps a bare decision function.
    #[must_use]
    pub fn predicate(
        name: impl Into<String>,
        decide: impl Fn(&TestDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Predicate {
            name: name.into(),
            decide: Arc::new(decide),
        }
    }

    /// Wraps a [`Filter`] implementation.
    #[must_use]
    pub fn dynamic(filter: impl Filter + 'static) -> Self {
        Self::Dynamic(Arc::new(filter))
    }

    /// Describes a value of type `T` that carries no filter capability.
    #[must_use]
    pub fn unsupported<T: ?Sized>() -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Normalizes the value into the canonical interface.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for unsupported shapes and for object
    /// filters without a `decide` member.
    pub fn normalize(self) -> Result<Arc<dyn Filter>, ConfigurationError> {
        match self {
            Self::Predicate {
                name,
                decide,
            } => Ok(Arc::new(MemberFilter {
                name,
                initialize: None,
                decide,
            })),
            Self::Object(object) => {
                let Some(decide) = object.decide else {
                    return Err(ConfigurationError::MissingDecide {
                        filter: object.name,
                    });
                };
                Ok(Arc::new(MemberFilter {
                    name: object.name,
                    initialize: object.initialize,
                    decide,
                }))
            }
            Self::Dynamic(filter) => Ok(filter),
            Self::Unsupported {
                type_name,
            } => Err(ConfigurationError::UnsupportedShape {
                type_name,
            }),
        }
    }
}

/// Normalized predicate or member-table filter.
struct MemberFilter {
    /// Filter name.
    name: String,
    /// Optional initializer.
    initialize: Option<InitializeFn>,
    /// Decision function.
    decide: DecideFn,
}

#[async_trait]
impl Filter for MemberFilter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self, profile: Arc<EnvironmentProfile>) -> Result<(), FilterError> {
        match &self.initialize {
            Some(initialize) => initialize(profile).await,
            None => Ok(()),
        }
    }

    async fn decide(&self, test: &TestDescriptor) -> Result<bool, FilterError> {
        Ok((self.decide)(test))
    }
}

// ============================================================================
// SECTION: Plugins
// ============================================================================

/// Construction options handed to every plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Classified topology of the runtime deployment.
    pub runtime_topology: TopologyKind,
}

/// Filter plugin constructed once per suite run.
pub trait FilterPlugin: Send + Sync {
    /// Returns the plugin name.
    fn name(&self) -> &str;

    /// Builds the plugin's filter for the runtime environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the filter cannot be built.
    fn build(&self, options: &FilterOptions) -> Result<FilterLike, ConfigurationError>;
}

/// Ordered set of plugins discovered for a suite run.
///
/// # Invariants
/// - Catalog order is registration order.
#[derive(Default)]
pub struct FilterCatalog {
    /// Plugins in discovery order.
    plugins: Vec<Box<dyn FilterPlugin>>,
}

impl FilterCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin.
    #[must_use]
    pub fn with(mut self, plugin: impl FilterPlugin + 'static) -> Self {
        self.push(plugin);
        self
    }

    /// Appends a plugin in place.
    pub fn push(&mut self, plugin: impl FilterPlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Returns the number of plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Iterates plugins in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FilterPlugin> {
        self.plugins.iter().map(|plugin| plugin.as_ref())
    }
}
