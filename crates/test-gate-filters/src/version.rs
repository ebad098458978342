// crates/test-gate-filters/src/version.rs
// ============================================================================
// Module: Server Version Filter
// Description: Gates tests on the deployment's server version.
// Purpose: Match `requires.version` ranges against the classified version.
// Dependencies: test-gate-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ServerVersionFilter`] captures the profile version during
//! initialization and evaluates each test's `requires.version` range against
//! it. A range is a space-separated list of comparators that must all hold:
//!
//! | Comparator | Meaning |
//! |------------|---------|
//! | `>=4.0`    | at least 4.0.0 |
//! | `<5`       | below 5.0.0 |
//! | `>4.2`     | 4.3.0 or later |
//! | `<=4.2`    | below 4.3.0 |
//! | `4.2.x`    | any 4.2 patch release |
//! | `=6.0.3`   | exactly 6.0.3 |
//!
//! Pre-release and build suffixes on the server version are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use test_gate_core::ConfigurationError;
use test_gate_core::EnvironmentProfile;
use test_gate_core::Filter;
use test_gate_core::FilterError;
use test_gate_core::FilterLike;
use test_gate_core::FilterOptions;
use test_gate_core::FilterPlugin;
use test_gate_core::TestDescriptor;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Version or range parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The input was empty.
    #[error("version input is empty")]
    Empty,
    /// A component was not a number or wildcard.
    #[error("invalid version component {component:?} in {input:?}")]
    InvalidComponent {
        /// Full input.
        input: String,
        /// Offending component.
        component: String,
    },
    /// More than three components were given.
    #[error("too many version components in {input:?}")]
    TooManyComponents {
        /// Full input.
        input: String,
    },
    /// A numeric component followed a wildcard.
    #[error("version component follows a wildcard in {input:?}")]
    WildcardOrder {
        /// Full input.
        input: String,
    },
}

// ============================================================================
// SECTION: Versions
// ============================================================================

/// Three-component server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl ServerVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `major[.minor[.patch]][-pre][+build]`; missing components are
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] when the input is empty or malformed.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        let release = trimmed.split(['-', '+']).next().unwrap_or_default();
        if release.is_empty() {
            return Err(VersionError::Empty);
        }
        let mut components = [0_u64; 3];
        for (index, part) in release.split('.').enumerate() {
            let Some(slot) = components.get_mut(index) else {
                return Err(VersionError::TooManyComponents {
                    input: trimmed.to_string(),
                });
            };
            *slot = parse_number(trimmed, part)?;
        }
        let [major, minor, patch] = components;
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Possibly partial version used inside comparators.
///
/// # Invariants
/// - Holds at most three components; absent trailing components are
///   wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VersionPattern {
    /// Specified leading components.
    components: Vec<u64>,
}

impl VersionPattern {
    /// Parses a pattern such as `4`, `4.2`, `4.2.x`, or `*`.
    fn parse(input: &str, raw: &str) -> Result<Self, VersionError> {
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }
        let mut components = Vec::new();
        let mut wildcard = false;
        for (index, part) in raw.split('.').enumerate() {
            if index >= 3 {
                return Err(VersionError::TooManyComponents {
                    input: input.to_string(),
                });
            }
            if matches!(part, "x" | "X" | "*") {
                wildcard = true;
                continue;
            }
            if wildcard {
                return Err(VersionError::WildcardOrder {
                    input: input.to_string(),
                });
            }
            components.push(parse_number(input, part)?);
        }
        Ok(Self {
            components,
        })
    }

    /// Returns true when every component is specified.
    fn is_exact(&self) -> bool {
        self.components.len() == 3
    }

    /// Lowest version the pattern covers.
    fn floor(&self) -> ServerVersion {
        let component = |index: usize| self.components.get(index).copied().unwrap_or(0);
        ServerVersion::new(component(0), component(1), component(2))
    }

    /// Lowest version above every version the pattern covers, if bounded.
    fn ceiling(&self) -> Option<ServerVersion> {
        let floor = self.floor();
        match self.components.len() {
            1 => Some(ServerVersion::new(floor.major.saturating_add(1), 0, 0)),
            2 => Some(ServerVersion::new(floor.major, floor.minor.saturating_add(1), 0)),
            3 => Some(ServerVersion::new(floor.major, floor.minor, floor.patch.saturating_add(1))),
            _ => None,
        }
    }

    /// Returns true when the version falls inside the pattern.
    fn covers(&self, version: ServerVersion) -> bool {
        let actual = [version.major, version.minor, version.patch];
        self.components.iter().zip(actual).all(|(expected, actual)| *expected == actual)
    }
}

// ============================================================================
// SECTION: Ranges
// ============================================================================

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    /// `=` or bare pattern.
    Eq,
    /// `>`.
    Gt,
    /// `>=`.
    Ge,
    /// `<`.
    Lt,
    /// `<=`.
    Le,
}

/// One operator applied to one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    /// Operator.
    operator: Operator,
    /// Operand.
    pattern: VersionPattern,
}

impl Comparator {
    /// Parses a single comparator token.
    fn parse(token: &str) -> Result<Self, VersionError> {
        let (operator, rest) = [
            (">=", Operator::Ge),
            ("<=", Operator::Le),
            (">", Operator::Gt),
            ("<", Operator::Lt),
            ("=", Operator::Eq),
        ]
        .into_iter()
        .find_map(|(prefix, operator)| token.strip_prefix(prefix).map(|rest| (operator, rest)))
        .unwrap_or((Operator::Eq, token));
        let pattern = VersionPattern::parse(token, rest.trim_start_matches('v'))?;
        Ok(Self {
            operator,
            pattern,
        })
    }

    /// Returns true when the version satisfies the comparator.
    fn matches(&self, version: ServerVersion) -> bool {
        let floor = self.pattern.floor();
        match self.operator {
            Operator::Eq => self.pattern.covers(version),
            Operator::Ge => version >= floor,
            Operator::Lt => version < floor,
            Operator::Gt if self.pattern.is_exact() => version > floor,
            Operator::Gt => self.pattern.ceiling().is_some_and(|ceiling| version >= ceiling),
            Operator::Le if self.pattern.is_exact() => version <= floor,
            Operator::Le => self.pattern.ceiling().is_none_or(|ceiling| version < ceiling),
        }
    }
}

/// Conjunction of comparators, e.g. `">=4.0 <5"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    /// Source text.
    source: String,
    /// Comparators that must all hold.
    comparators: Vec<Comparator>,
}

impl VersionRange {
    /// Parses a space-separated comparator list.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] when the range is empty or any comparator is
    /// malformed.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let comparators =
            raw.split_whitespace().map(Comparator::parse).collect::<Result<Vec<_>, _>>()?;
        if comparators.is_empty() {
            return Err(VersionError::Empty);
        }
        Ok(Self {
            source: raw.trim().to_string(),
            comparators,
        })
    }

    /// Returns true when the version satisfies every comparator.
    #[must_use]
    pub fn matches(&self, version: ServerVersion) -> bool {
        self.comparators.iter().all(|comparator| comparator.matches(version))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Filter name reported in decision reports.
pub const SERVER_VERSION_FILTER: &str = "server-version";

/// Rejects tests whose version range excludes the server version.
///
/// # Invariants
/// - `version` is set exactly once, during initialization.
#[derive(Debug, Default)]
pub struct ServerVersionFilter {
    /// Server version captured from the profile.
    version: OnceLock<ServerVersion>,
}

impl ServerVersionFilter {
    /// Creates an uninitialized filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured server version.
    #[must_use]
    pub fn version(&self) -> Option<ServerVersion> {
        self.version.get().copied()
    }
}

#[async_trait]
impl Filter for ServerVersionFilter {
    fn name(&self) -> &str {
        SERVER_VERSION_FILTER
    }

    async fn initialize(&self, profile: Arc<EnvironmentProfile>) -> Result<(), FilterError> {
        let parsed = ServerVersion::parse(profile.version())
            .map_err(|err| FilterError::Initialize(format!("server version: {err}")))?;
        let captured = *self.version.get_or_init(|| parsed);
        debug!(version = %captured, "server version captured");
        Ok(())
    }

    async fn decide(&self, test: &TestDescriptor) -> Result<bool, FilterError> {
        let Some(raw) = test.metadata().requires.version.as_deref() else {
            return Ok(true);
        };
        let range = VersionRange::parse(raw)
            .map_err(|err| FilterError::Decide(format!("requires.version: {err}")))?;
        let Some(version) = self.version() else {
            return Err(FilterError::Decide("server version is not initialized".to_string()));
        };
        let accepted = range.matches(version);
        debug!(test = %test.id(), range = %range, version = %version, accepted, "version checked");
        Ok(accepted)
    }
}

/// Plugin building a [`ServerVersionFilter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerVersionPlugin;

impl FilterPlugin for ServerVersionPlugin {
    fn name(&self) -> &str {
        SERVER_VERSION_FILTER
    }

    fn build(&self, _options: &FilterOptions) -> Result<FilterLike, ConfigurationError> {
        Ok(FilterLike::dynamic(ServerVersionFilter::new()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses one numeric version component.
fn parse_number(input: &str, part: &str) -> Result<u64, VersionError> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(VersionError::InvalidComponent {
            input: input.to_string(),
            component: part.to_string(),
        });
    }
    part.parse().map_err(|_| VersionError::InvalidComponent {
        input: input.to_string(),
        component: part.to_string(),
    })
}
