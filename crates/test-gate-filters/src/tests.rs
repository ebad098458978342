// crates/test-gate-filters/src/tests.rs
// ============================================================================
// Module: Filter Unit Tests
// Description: Version, range, and OS requirement parsing.
// Purpose: Pin comparator semantics and parse failures.
// Dependencies: test-gate-filters, proptest
// ============================================================================

//! ## Overview
//! Unit tests for the requirement parsers behind the built-in filters.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use proptest::prelude::*;

use crate::os::OsRequirement;
use crate::os::OsRequirementError;
use crate::version::ServerVersion;
use crate::version::VersionError;
use crate::version::VersionRange;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn matches(range: &str, version: &str) -> bool {
    VersionRange::parse(range).unwrap().matches(ServerVersion::parse(version).unwrap())
}

// ============================================================================
// SECTION: Versions
// ============================================================================

#[test]
fn server_version_pads_and_strips_suffixes() {
    assert_eq!(ServerVersion::parse("7.0.4").unwrap(), ServerVersion::new(7, 0, 4));
    assert_eq!(ServerVersion::parse("4.4").unwrap(), ServerVersion::new(4, 4, 0));
    assert_eq!(ServerVersion::parse(" 8 ").unwrap(), ServerVersion::new(8, 0, 0));
    assert_eq!(ServerVersion::parse("8.0.0-rc3").unwrap(), ServerVersion::new(8, 0, 0));
    assert_eq!(ServerVersion::parse("6.0.1+build.9").unwrap(), ServerVersion::new(6, 0, 1));
    assert_eq!(ServerVersion::new(6, 0, 1).to_string(), "6.0.1");
}

#[test]
fn server_version_rejects_malformed_input() {
    assert_eq!(ServerVersion::parse(""), Err(VersionError::Empty));
    assert!(matches!(ServerVersion::parse("7.a"), Err(VersionError::InvalidComponent { .. })));
    assert!(matches!(ServerVersion::parse("7..1"), Err(VersionError::InvalidComponent { .. })));
    assert!(matches!(ServerVersion::parse("1.2.3.4"), Err(VersionError::TooManyComponents { .. })));
}

// ============================================================================
// SECTION: Ranges
// ============================================================================

#[test]
fn bounded_range_matches_inside_only() {
    assert!(matches(">=4.0 <5", "4.0.0"));
    assert!(matches(">=4.0 <5", "4.4.29"));
    assert!(!matches(">=4.0 <5", "5.0.0"));
    assert!(!matches(">=4.0 <5", "3.6.23"));
}

#[test]
fn wildcard_and_bare_patterns_match_prefix() {
    assert!(matches("4.2.x", "4.2.24"));
    assert!(!matches("4.2.x", "4.3.0"));
    assert!(matches("4.2", "4.2.1"));
    assert!(matches("*", "0.0.1"));
    assert!(matches("=6.0.3", "6.0.3"));
    assert!(!matches("=6.0.3", "6.0.4"));
}

#[test]
fn partial_strict_bounds_round_to_the_pattern() {
    assert!(!matches(">4.2", "4.2.9"));
    assert!(matches(">4.2", "4.3.0"));
    assert!(matches("<=4.2", "4.2.9"));
    assert!(!matches("<=4.2", "4.3.0"));
    assert!(matches(">6.0.3", "6.0.4"));
    assert!(!matches(">6.0.3", "6.0.3"));
    assert!(matches("<=6.0.3", "6.0.3"));
}

#[test]
fn range_parse_rejects_bad_comparators() {
    assert_eq!(VersionRange::parse("   "), Err(VersionError::Empty));
    assert_eq!(VersionRange::parse(">="), Err(VersionError::Empty));
    assert!(matches!(VersionRange::parse(">=four"), Err(VersionError::InvalidComponent { .. })));
    assert!(matches!(VersionRange::parse("4.x.2"), Err(VersionError::WildcardOrder { .. })));
    assert_eq!(VersionRange::parse(" >=4.0  <5 ").unwrap().to_string(), ">=4.0  <5");
}

proptest! {
    #[test]
    fn exact_pattern_matches_only_itself(
        major in 0_u64..20,
        minor in 0_u64..20,
        patch in 0_u64..20,
        bump in 1_u64..5,
    ) {
        let version = ServerVersion::new(major, minor, patch);
        let range = VersionRange::parse(&format!("={version}")).unwrap();
        prop_assert!(range.matches(version));
        prop_assert!(!range.matches(ServerVersion::new(major, minor, patch + bump)));
    }

    #[test]
    fn ge_and_lt_partition_versions(
        bound in (0_u64..10, 0_u64..10),
        version in (0_u64..10, 0_u64..10, 0_u64..10),
    ) {
        let version = ServerVersion::new(version.0, version.1, version.2);
        let at_least = VersionRange::parse(&format!(">={}.{}", bound.0, bound.1)).unwrap();
        let below = VersionRange::parse(&format!("<{}.{}", bound.0, bound.1)).unwrap();
        prop_assert_ne!(at_least.matches(version), below.matches(version));
    }
}

// ============================================================================
// SECTION: Operating Systems
// ============================================================================

#[test]
fn os_allow_list_and_exclusions() {
    let allow = OsRequirement::parse("linux, macos").unwrap();
    assert!(allow.allows("linux"));
    assert!(allow.allows("Darwin"));
    assert!(!allow.allows("windows"));

    let exclude = OsRequirement::parse("!windows").unwrap();
    assert!(exclude.allows("linux"));
    assert!(!exclude.allows("win32"));

    let mixed = OsRequirement::parse("linux,!linux").unwrap();
    assert!(!mixed.allows("linux"));
}

#[test]
fn os_requirement_rejects_empty_entries() {
    assert_eq!(
        OsRequirement::parse("linux,,macos"),
        Err(OsRequirementError::EmptyEntry {
            input: "linux,,macos".to_string()
        })
    );
    assert!(matches!(OsRequirement::parse(""), Err(OsRequirementError::EmptyEntry { .. })));
    assert!(matches!(OsRequirement::parse("! "), Err(OsRequirementError::EmptyEntry { .. })));
}
