// crates/test-gate-core/tests/registry.rs
// ============================================================================
// Module: Filter Registry Tests
// Description: Registration validation, normalization, and ordering.
// Purpose: Ensure every admissible shape normalizes and invalid shapes fail.
// ============================================================================

//! Filter registry tests for shape validation and catalog registration.

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
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use common::BrokenPlugin;
use common::RecordingFilter;
use common::RecordingPlugin;
use common::event_log;
use common::events;
use common::nested_test;
use test_gate_core::ConfigurationError;
use test_gate_core::EnvironmentProfile;
use test_gate_core::FilterCatalog;
use test_gate_core::FilterLike;
use test_gate_core::FilterObject;
use test_gate_core::FilterOptions;
use test_gate_core::FilterRegistry;
use test_gate_core::TopologyKind;

// ============================================================================
// SECTION: Shape Validation
// ============================================================================

#[test]
fn register_rejects_value_without_filter_capability() {
    let mut registry = FilterRegistry::new();
    let err = registry.register(FilterLike::unsupported::<String>()).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnsupportedShape { .. }));
    assert!(err.to_string().contains("function or an object"));
    assert!(registry.is_empty());
}

#[test]
fn register_rejects_object_without_decide() {
    let mut registry = FilterRegistry::new();
    let object = FilterObject::named("init-only").with_initialize(|_profile| async { Ok(()) });
    let err = registry.register(FilterLike::Object(object)).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::MissingDecide {
            filter: "init-only".to_string()
        }
    );
    assert!(registry.is_empty());
}

#[tokio::test]
async fn predicate_is_wrapped_as_decide_member() {
    let mut registry = FilterRegistry::new();
    registry.register(FilterLike::predicate("never", |_test| false)).unwrap();

    let filter = registry.iter().next().unwrap();
    assert_eq!(filter.name(), "never");
    let profile = Arc::new(EnvironmentProfile::new(TopologyKind::Single, "7.0.0"));
    filter.initialize(profile).await.unwrap();
    assert!(!filter.decide(&nested_test("t1")).await.unwrap());
}

#[tokio::test]
async fn object_members_are_preserved() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let object = FilterObject::named("object")
        .with_initialize(move |_profile| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .with_decide(|test| test.title().starts_with("nested"));

    let mut registry = FilterRegistry::new();
    registry.register(FilterLike::Object(object)).unwrap();
    let filter = registry.iter().next().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let profile = Arc::new(EnvironmentProfile::new(TopologyKind::Single, "7.0.0"));
    filter.initialize(profile).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(filter.decide(&nested_test("t1")).await.unwrap());
}

// ============================================================================
// SECTION: Ordering
// ============================================================================

#[test]
fn registration_order_is_preserved_without_deduplication() {
    let log = event_log();
    let mut registry = FilterRegistry::new();
    registry.register(FilterLike::dynamic(RecordingFilter::new("b", true, &log))).unwrap();
    registry.register(FilterLike::predicate("a", |_test| true)).unwrap();
    registry.register(FilterLike::dynamic(RecordingFilter::new("b", true, &log))).unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.names(), vec!["b", "a", "b"]);
}

// ============================================================================
// SECTION: Catalog Registration
// ============================================================================

#[tokio::test]
async fn from_catalog_registers_every_plugin_with_runtime_topology() {
    let log = event_log();
    let first = RecordingPlugin::new("first", true, &log);
    let second = RecordingPlugin::new("second", false, &log);
    let first_seen = Arc::clone(&first.seen_topology);
    let second_seen = Arc::clone(&second.seen_topology);
    let catalog = FilterCatalog::new().with(first).with(second);

    let options = FilterOptions {
        runtime_topology: TopologyKind::Sharded,
    };
    let registry = FilterRegistry::from_catalog(&catalog, &options).unwrap();

    assert_eq!(registry.names(), vec!["first", "second"]);
    assert_eq!(*first_seen.lock().unwrap(), Some(TopologyKind::Sharded));
    assert_eq!(*second_seen.lock().unwrap(), Some(TopologyKind::Sharded));
    for filter in registry.iter() {
        filter.decide(&nested_test("t1")).await.unwrap();
    }
    assert_eq!(events(&log), vec!["decide:first:t1", "decide:second:t1"]);
}

#[test]
fn from_catalog_fails_on_invalid_plugin_output() {
    let log = event_log();
    let catalog =
        FilterCatalog::new().with(RecordingPlugin::new("ok", true, &log)).with(BrokenPlugin);
    let options = FilterOptions {
        runtime_topology: TopologyKind::Single,
    };
    let err = FilterRegistry::from_catalog(&catalog, &options).err().unwrap();
    assert!(matches!(err, ConfigurationError::UnsupportedShape { .. }));
}

#[test]
fn empty_catalog_yields_empty_registry() {
    let options = FilterOptions {
        runtime_topology: TopologyKind::Unknown,
    };
    let registry = FilterRegistry::from_catalog(&FilterCatalog::new(), &options).unwrap();
    assert!(registry.is_empty());
}
