// crates/test-gate-filters/src/os.rs
// ============================================================================
// Module: Operating System Filter
// Description: Gates tests on the host operating system.
// Purpose: Match `requires.os` include and exclude lists.
// Dependencies: test-gate-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! `requires.os` is a comma-separated list. Plain entries form an allow
//! list; entries prefixed with `!` are exclusions. A test runs when no
//! exclusion names the host and the allow list, if any, does. Names are
//! compared case-insensitively after alias folding (`darwin` and `osx` are
//! `macos`, `win32` is `windows`).

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
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `requires.os` parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OsRequirementError {
    /// An entry, or the whole list, was empty.
    #[error("empty operating system entry in {input:?}")]
    EmptyEntry {
        /// Full input.
        input: String,
    },
}

// ============================================================================
// SECTION: Requirements
// ============================================================================

/// Parsed `requires.os` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRequirement {
    /// Allowed systems; empty allows all.
    include: Vec<String>,
    /// Excluded systems.
    exclude: Vec<String>,
}

impl OsRequirement {
    /// Parses a requirement such as `"linux,macos"` or `"!windows"`.
    ///
    /// # Errors
    ///
    /// Returns [`OsRequirementError::EmptyEntry`] when the list has no
    /// entries or an entry is empty.
    pub fn parse(raw: &str) -> Result<Self, OsRequirementError> {
        let mut requirement = Self::default();
        for entry in raw.split(',') {
            let entry = entry.trim();
            let (excluded, name) =
                entry.strip_prefix('!').map_or((false, entry), |name| (true, name.trim()));
            if name.is_empty() {
                return Err(OsRequirementError::EmptyEntry {
                    input: raw.to_string(),
                });
            }
            let name = normalize_os(name);
            if excluded {
                requirement.exclude.push(name);
            } else {
                requirement.include.push(name);
            }
        }
        Ok(requirement)
    }

    /// Returns true when the host satisfies the requirement.
    #[must_use]
    pub fn allows(&self, host_os: &str) -> bool {
        let host = normalize_os(host_os);
        !self.exclude.contains(&host) && (self.include.is_empty() || self.include.contains(&host))
    }
}

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Filter name reported in decision reports.
pub const OS_FILTER: &str = "os";

/// Rejects tests whose `requires.os` excludes the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsFilter {
    /// Normalized host operating system.
    host_os: String,
}

impl OsFilter {
    /// Creates a filter for the named host operating system.
    #[must_use]
    pub fn new(host_os: &str) -> Self {
        Self {
            host_os: normalize_os(host_os),
        }
    }

    /// Creates a filter for the operating system this binary targets.
    #[must_use]
    pub fn current() -> Self {
        Self::new(std::env::consts::OS)
    }

    /// Returns the normalized host operating system.
    #[must_use]
    pub fn host_os(&self) -> &str {
        &self.host_os
    }
}

#[async_trait]
impl Filter for OsFilter {
    fn name(&self) -> &str {
        OS_FILTER
    }

    async fn decide(&self, test: &TestDescriptor) -> Result<bool, FilterError> {
        let Some(raw) = test.metadata().requires.os.as_deref() else {
            return Ok(true);
        };
        let requirement = OsRequirement::parse(raw)
            .map_err(|err| FilterError::Decide(format!("requires.os: {err}")))?;
        let accepted = requirement.allows(&self.host_os);
        if !accepted {
            debug!(
                test = %test.id(),
                host_os = %self.host_os,
                "operating system excluded by test"
            );
        }
        Ok(accepted)
    }
}

/// Plugin building an [`OsFilter`].
#[derive(Debug, Clone, Default)]
pub struct OsPlugin {
    /// Host override; the compile target when absent.
    host_os: Option<String>,
}

impl OsPlugin {
    /// Creates a plugin for the compile-target operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a plugin for an explicit host operating system.
    #[must_use]
    pub fn for_host(host_os: impl Into<String>) -> Self {
        Self {
            host_os: Some(host_os.into()),
        }
    }
}

impl FilterPlugin for OsPlugin {
    fn name(&self) -> &str {
        OS_FILTER
    }

    fn build(&self, _options: &FilterOptions) -> Result<FilterLike, ConfigurationError> {
        let filter = self.host_os.as_deref().map_or_else(OsFilter::current, OsFilter::new);
        Ok(FilterLike::dynamic(filter))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Lowercases a system name and folds common aliases.
fn normalize_os(name: &str) -> String {
    let lowered = name.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "darwin" | "osx" | "mac" => "macos".to_string(),
        "win32" | "win" => "windows".to_string(),
        _ => lowered,
    }
}
