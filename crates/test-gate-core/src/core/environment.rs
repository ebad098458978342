// crates/test-gate-core/src/core/environment.rs
// ============================================================================
// Module: Environment Profiles
// Description: Topology kinds, deployment endpoints, and classified profiles.
// Purpose: Describe the deployment a suite runs against.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! An [`EnvironmentProfile`] is produced once per suite run by the
//! environment classifier and shared read-only with every filter. The
//! [`TopologyKind`] mapping from driver topology labels is total: unknown
//! labels classify as [`TopologyKind::Unknown`] instead of failing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Port assumed when a connection string omits one.
pub const DEFAULT_PORT: u16 = 27017;

/// Deployment URI used when no override is configured.
pub const DEFAULT_DEPLOYMENT_URI: &str = "service://localhost:27017";

/// Database appended to the deployment URI for profile-scoped URLs.
pub const DEFAULT_DATABASE_NAME: &str = "integration_tests";

// ============================================================================
// SECTION: Topology Kind
// ============================================================================

/// Structural shape of a deployment.
///
/// # Invariants
/// - Labels are lowercase ASCII and stable for filter metadata.
/// - `Unknown` means "unclassified"; topology-aware filters must not gate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// Single-node deployment.
    Single,
    /// Replicated set.
    ReplicaSet,
    /// Routed (sharded) cluster.
    Sharded,
    /// Topology label was not recognized.
    Unknown,
}

impl TopologyKind {
    /// Every topology kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::Single, Self::ReplicaSet, Self::Sharded, Self::Unknown];

    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::ReplicaSet => "replicaset",
            Self::Sharded => "sharded",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a driver-reported topology label to a kind.
    ///
    /// Labels compare ASCII case-insensitively after trimming. Anything not
    /// listed maps to [`TopologyKind::Unknown`].
    #[must_use]
    pub fn classify(label: &str) -> Self {
        let label = label.trim();
        let matches =
            |candidates: &[&str]| candidates.iter().any(|c| label.eq_ignore_ascii_case(c));
        if matches(&["server", "standalone", "single"]) {
            Self::Single
        } else if matches(&["replset", "replicaset"]) {
            Self::ReplicaSet
        } else if matches(&["mongos", "sharded"]) {
            Self::Sharded
        } else {
            Self::Unknown
        }
    }

    /// Returns true when the kind came from a recognized label.
    #[must_use]
    pub const fn is_classified(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Build Info
// ============================================================================

/// Administrative build information reported by the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Reported server version string.
    pub version: String,
}

// ============================================================================
// SECTION: Connection String
// ============================================================================

/// Connection string parse failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionStringError {
    /// The URI has no `scheme://` prefix.
    #[error("connection string missing scheme: {uri}")]
    MissingScheme {
        /// Offending URI.
        uri: String,
    },
    /// The URI has an empty host list or an empty host entry.
    #[error("connection string has no host: {uri}")]
    MissingHost {
        /// Offending URI.
        uri: String,
    },
    /// A host entry could not be parsed.
    #[error("connection string host invalid: {uri} ({reason})")]
    InvalidHost {
        /// Offending URI.
        uri: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Host and port of one deployment member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAddress {
    /// Host name or address literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Parsed deployment connection string.
///
/// # Invariants
/// - `hosts` is non-empty and preserves the URI order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    /// URI scheme without the `://` separator.
    scheme: String,
    /// Hosts listed in the authority section.
    hosts: Vec<HostAddress>,
}

impl ConnectionString {
    /// Parses `scheme://[user@]host[:port][,host[:port]...][/path][?query]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionStringError`] when the scheme or host list is
    /// missing or a host entry does not parse.
    pub fn parse(uri: &str) -> Result<Self, ConnectionStringError> {
        let trimmed = uri.trim();
        let split = trimmed.split_once("://");
        let Some((scheme, rest)) = split.filter(|(scheme, _)| !scheme.is_empty()) else {
            return Err(ConnectionStringError::MissingScheme {
                uri: uri.to_string(),
            });
        };
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (authority, _) = rest.split_at(authority_end);
        let host_list = authority.rsplit_once('@').map_or(authority, |(_, hosts)| hosts);

        let mut hosts = Vec::new();
        for entry in host_list.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(ConnectionStringError::MissingHost {
                    uri: uri.to_string(),
                });
            }
            let parsed = Url::parse(&format!("{scheme}://{entry}")).map_err(|err| {
                ConnectionStringError::InvalidHost {
                    uri: uri.to_string(),
                    reason: err.to_string(),
                }
            })?;
            let Some(host) = parsed.host_str().filter(|host| !host.is_empty()) else {
                return Err(ConnectionStringError::MissingHost {
                    uri: uri.to_string(),
                });
            };
            hosts.push(HostAddress {
                host: host.to_string(),
                port: parsed.port().unwrap_or(DEFAULT_PORT),
            });
        }

        Ok(Self {
            scheme: scheme.to_string(),
            hosts,
        })
    }

    /// Returns the URI scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns every listed host in URI order.
    #[must_use]
    pub fn hosts(&self) -> &[HostAddress] {
        &self.hosts
    }

    /// Returns the first listed host.
    #[must_use]
    pub fn primary(&self) -> Option<&HostAddress> {
        self.hosts.first()
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Deployment settings the runtime needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSettings {
    /// Deployment connection string.
    pub deployment_uri: String,
    /// Database name appended for profile-scoped URLs.
    pub database_name: String,
}

impl GateSettings {
    /// Creates settings for the provided URI with the default database.
    #[must_use]
    pub fn new(deployment_uri: impl Into<String>) -> Self {
        Self {
            deployment_uri: deployment_uri.into(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }

    /// Returns `<deployment_uri>/<database_name>`.
    #[must_use]
    pub fn scoped_url(&self) -> String {
        format!("{}/{}", self.deployment_uri.trim_end_matches('/'), self.database_name)
    }
}

impl Default for GateSettings {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT_URI)
    }
}

// ============================================================================
// SECTION: Environment Profile
// ============================================================================

/// Classified, versioned description of the target deployment.
///
/// # Invariants
/// - Immutable after construction; shared via [`Arc`].
/// - `host`, `port`, and `url` are `None` for [`TopologyKind::Single`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentProfile {
    /// Topology kind.
    kind: TopologyKind,
    /// Reported server version.
    version: String,
    /// Primary host for derived profiles.
    host: Option<String>,
    /// Primary port for derived profiles.
    port: Option<u16>,
    /// Profile-scoped database URL for derived profiles.
    url: Option<String>,
}

impl EnvironmentProfile {
    /// Creates a profile without derived endpoint fields.
    #[must_use]
    pub fn new(kind: TopologyKind, version: impl Into<String>) -> Self {
        Self {
            kind,
            version: version.into(),
            host: None,
            port: None,
            url: None,
        }
    }

    /// Creates a profile carrying the primary endpoint and scoped URL.
    #[must_use]
    pub fn with_endpoint(
        kind: TopologyKind,
        version: impl Into<String>,
        primary: &HostAddress,
        url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            version: version.into(),
            host: Some(primary.host.clone()),
            port: Some(primary.port),
            url: Some(url.into()),
        }
    }

    /// Returns the topology kind.
    #[must_use]
    pub const fn kind(&self) -> TopologyKind {
        self.kind
    }

    /// Returns the reported server version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the primary host, when derived.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the primary port, when derived.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the profile-scoped database URL, when derived.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

// ============================================================================
// SECTION: Test Configuration
// ============================================================================

/// Configuration object exposed to every test of a suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfiguration {
    /// Classified environment.
    pub profile: Arc<EnvironmentProfile>,
    /// Settings the run was started with.
    pub settings: GateSettings,
}

impl TestConfiguration {
    /// Builds the configuration for a classified environment.
    #[must_use]
    pub const fn new(profile: Arc<EnvironmentProfile>, settings: GateSettings) -> Self {
        Self {
            profile,
            settings,
        }
    }

    /// Returns the URL tests should connect to.
    ///
    /// Derived profiles carry a scoped URL; single-node profiles fall back to
    /// the configured deployment URI.
    #[must_use]
    pub fn connection_url(&self) -> &str {
        self.profile.url().unwrap_or(&self.settings.deployment_uri)
    }
}
