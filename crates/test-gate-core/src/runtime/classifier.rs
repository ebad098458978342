// crates/test-gate-core/src/runtime/classifier.rs
// ============================================================================
// Module: Environment Classifier
// Description: Maps a live deployment connection to an environment profile.
// Purpose: Discover topology kind and version once per suite run.
// Dependencies: crate::core, crate::interfaces, tokio, tracing
// ============================================================================

//! ## Overview
//! Classification reads the driver's topology label, then runs the
//! build-info query and (for non-single kinds) the connection-string parse
//! concurrently. Both branches must complete before a profile is returned.
//! An unrecognized label logs a warning and yields [`TopologyKind::Unknown`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;
use tracing::warn;

use crate::core::ConnectionStringError;
use crate::core::EnvironmentProfile;
use crate::core::GateSettings;
use crate::core::TopologyKind;
use crate::interfaces::DeploymentConnection;
use crate::interfaces::DeploymentDriver;
use crate::interfaces::DriverError;
use crate::runtime::SetupError;

// ============================================================================
// SECTION: Classifier
// ============================================================================

/// Classifies deployments reached through one driver.
pub struct EnvironmentClassifier<'a> {
    /// Driver used for connection-string parsing.
    driver: &'a dyn DeploymentDriver,
    /// Deployment settings.
    settings: &'a GateSettings,
}

impl<'a> EnvironmentClassifier<'a> {
    /// Creates a classifier for the driver and settings.
    #[must_use]
    pub const fn new(driver: &'a dyn DeploymentDriver, settings: &'a GateSettings) -> Self {
        Self {
            driver,
            settings,
        }
    }

    /// Produces the environment profile for an open connection.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the build-info query or the
    /// connection-string parse fails.
    pub async fn classify(
        &self,
        connection: &dyn DeploymentConnection,
    ) -> Result<EnvironmentProfile, SetupError> {
        let label = connection.topology_label();
        let kind = TopologyKind::classify(&label);
        if !kind.is_classified() {
            warn!(topology = %label, "topology type is not recognized");
        }

        let endpoint = async {
            if matches!(kind, TopologyKind::Single) {
                Ok(None)
            } else {
                self.driver.parse_connection_string(&self.settings.deployment_uri).await.map(Some)
            }
        };
        let (build_info, endpoint) = tokio::join!(connection.build_info(), endpoint);
        let build_info = build_info.map_err(SetupError::BuildInfo)?;
        let endpoint = endpoint.map_err(SetupError::ConnectionString)?;

        let profile = match endpoint {
            None => EnvironmentProfile::new(kind, build_info.version),
            Some(parsed) => {
                let Some(primary) = parsed.primary() else {
                    return Err(SetupError::ConnectionString(DriverError::ConnectionString(
                        ConnectionStringError::MissingHost {
                            uri: self.settings.deployment_uri.clone(),
                        },
                    )));
                };
                EnvironmentProfile::with_endpoint(
                    kind,
                    build_info.version,
                    primary,
                    self.settings.scoped_url(),
                )
            }
        };
        info!(kind = %profile.kind(), version = profile.version(), "environment classified");
        Ok(profile)
    }
}
