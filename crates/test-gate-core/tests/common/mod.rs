// crates/test-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Test Gate Core Test Fixtures
// Description: Fake deployment driver, recording filters, and descriptors.
// Purpose: Share deterministic collaborators across core integration tests.
// ============================================================================

//! Shared fixtures for test-gate-core integration tests.

#![allow(dead_code, reason = "Each test binary uses a subset of the fixtures.")]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use test_gate_core::BuildInfo;
use test_gate_core::ConfigurationError;
use test_gate_core::DeploymentConnection;
use test_gate_core::DeploymentDriver;
use test_gate_core::DriverError;
use test_gate_core::EnvironmentProfile;
use test_gate_core::Filter;
use test_gate_core::FilterError;
use test_gate_core::FilterLike;
use test_gate_core::FilterOptions;
use test_gate_core::FilterPlugin;
use test_gate_core::FixtureReset;
use test_gate_core::ResourceDiagnostics;
use test_gate_core::SuiteRef;
use test_gate_core::TestDescriptor;
use test_gate_core::TopologyKind;

// ============================================================================
// SECTION: Fake Driver
// ============================================================================

/// Counters shared between a fake driver and its connections.
#[derive(Debug, Default)]
pub struct DriverCounters {
    pub connects: AtomicUsize,
    pub build_info_calls: AtomicUsize,
    pub closes: AtomicUsize,
}

impl DriverCounters {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn build_info_calls(&self) -> usize {
        self.build_info_calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Deployment driver returning a scripted topology and version.
#[derive(Clone)]
pub struct FakeDriver {
    pub label: String,
    pub version: String,
    pub connect_error: Option<DriverError>,
    pub build_info_error: Option<DriverError>,
    pub close_error: Option<DriverError>,
    pub counters: Arc<DriverCounters>,
}

impl FakeDriver {
    pub fn new(label: &str, version: &str) -> Self {
        Self {
            label: label.to_string(),
            version: version.to_string(),
            connect_error: None,
            build_info_error: None,
            close_error: None,
            counters: Arc::new(DriverCounters::default()),
        }
    }

    pub fn failing_connect(mut self, message: &str) -> Self {
        self.connect_error = Some(DriverError::Connect(message.to_string()));
        self
    }

    pub fn failing_build_info(mut self, message: &str) -> Self {
        self.build_info_error = Some(DriverError::Command(message.to_string()));
        self
    }

    pub fn failing_close(mut self, message: &str) -> Self {
        self.close_error = Some(DriverError::Close(message.to_string()));
        self
    }

    pub fn counters(&self) -> Arc<DriverCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl DeploymentDriver for FakeDriver {
    async fn connect(&self, _uri: &str) -> Result<Arc<dyn DeploymentConnection>, DriverError> {
        if let Some(err) = &self.connect_error {
            return Err(err.clone());
        }
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeConnection {
            driver: self.clone(),
        }))
    }
}

/// Connection produced by [`FakeDriver`].
pub struct FakeConnection {
    driver: FakeDriver,
}

#[async_trait]
impl DeploymentConnection for FakeConnection {
    async fn build_info(&self) -> Result<BuildInfo, DriverError> {
        self.driver.counters.build_info_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.driver.build_info_error {
            return Err(err.clone());
        }
        Ok(BuildInfo {
            version: self.driver.version.clone(),
        })
    }

    fn topology_label(&self) -> String {
        self.driver.label.clone()
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.driver.counters.closes.fetch_add(1, Ordering::SeqCst);
        match &self.driver.close_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Recording Filter
// ============================================================================

/// Shared, ordered event log.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Filter that records decide calls, and initialize calls once enabled.
pub struct RecordingFilter {
    pub name: String,
    pub accept: bool,
    pub records_init: bool,
    pub init_error: Option<String>,
    pub decide_error: Option<String>,
    pub log: EventLog,
}

impl RecordingFilter {
    pub fn new(name: &str, accept: bool, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            accept,
            records_init: false,
            init_error: None,
            decide_error: None,
            log: Arc::clone(log),
        }
    }

    pub fn with_init(mut self) -> Self {
        self.records_init = true;
        self
    }

    pub fn failing_init(mut self, message: &str) -> Self {
        self.records_init = true;
        self.init_error = Some(message.to_string());
        self
    }

    pub fn failing_decide(mut self, message: &str) -> Self {
        self.decide_error = Some(message.to_string());
        self
    }
}

#[async_trait]
impl Filter for RecordingFilter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self, profile: Arc<EnvironmentProfile>) -> Result<(), FilterError> {
        if !self.records_init {
            return Ok(());
        }
        self.log.lock().unwrap().push(format!("init:{}:{}", self.name, profile.kind()));
        match &self.init_error {
            Some(message) => Err(FilterError::Initialize(message.clone())),
            None => Ok(()),
        }
    }

    async fn decide(&self, test: &TestDescriptor) -> Result<bool, FilterError> {
        self.log.lock().unwrap().push(format!("decide:{}:{}", self.name, test.id()));
        match &self.decide_error {
            Some(message) => Err(FilterError::Decide(message.clone())),
            None => Ok(self.accept),
        }
    }
}

// ============================================================================
// SECTION: Plugins
// ============================================================================

/// Plugin that builds a [`RecordingFilter`] and records the runtime topology.
pub struct RecordingPlugin {
    pub name: String,
    pub accept: bool,
    pub records_init: bool,
    pub init_error: Option<String>,
    pub log: EventLog,
    pub seen_topology: Arc<Mutex<Option<TopologyKind>>>,
}

impl RecordingPlugin {
    pub fn new(name: &str, accept: bool, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            accept,
            records_init: false,
            init_error: None,
            log: Arc::clone(log),
            seen_topology: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_init(mut self) -> Self {
        self.records_init = true;
        self
    }

    pub fn failing_init(mut self, message: &str) -> Self {
        self.records_init = true;
        self.init_error = Some(message.to_string());
        self
    }
}

impl FilterPlugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, options: &FilterOptions) -> Result<FilterLike, ConfigurationError> {
        *self.seen_topology.lock().unwrap() = Some(options.runtime_topology);
        let mut filter = RecordingFilter::new(&self.name, self.accept, &self.log);
        filter.records_init = self.records_init;
        filter.init_error = self.init_error.clone();
        Ok(FilterLike::dynamic(filter))
    }
}

/// Plugin whose build always fails.
pub struct BrokenPlugin;

impl FilterPlugin for BrokenPlugin {
    fn name(&self) -> &str {
        "broken"
    }

    fn build(&self, _options: &FilterOptions) -> Result<FilterLike, ConfigurationError> {
        Ok(FilterLike::unsupported::<u32>())
    }
}

// ============================================================================
// SECTION: Fixtures and Diagnostics
// ============================================================================

/// Fixture reset that counts calls.
#[derive(Debug, Default)]
pub struct CountingReset {
    pub resets: AtomicUsize,
}

impl CountingReset {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl FixtureReset for CountingReset {
    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Diagnostics source reporting fixed handles and counting dumps.
#[derive(Debug, Default)]
pub struct StaticDiagnostics {
    pub handles: Vec<String>,
    pub dumps: AtomicUsize,
}

impl StaticDiagnostics {
    pub fn dumps(&self) -> usize {
        self.dumps.load(Ordering::SeqCst)
    }
}

impl ResourceDiagnostics for StaticDiagnostics {
    fn open_handles(&self) -> Vec<String> {
        self.dumps.fetch_add(1, Ordering::SeqCst);
        self.handles.clone()
    }
}

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Test in a suite nested below a root child.
pub fn nested_test(id: &str) -> TestDescriptor {
    TestDescriptor::new(
        id,
        format!("nested {id}"),
        SuiteRef::nested("inner"),
        Some(SuiteRef::nested("outer")),
    )
}

/// Test in a suite that is a direct child of the root.
pub fn root_child_test(id: &str) -> TestDescriptor {
    TestDescriptor::new(
        id,
        format!("root child {id}"),
        SuiteRef::nested("outer"),
        Some(SuiteRef::root("root")),
    )
}
