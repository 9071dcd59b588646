//! Top-level manifest apply: one default-domain check, then
//! collect → normalize → apply for each application in manifest order.

use crate::applier::Applier;
use crate::error::{ManifestError, Result};
use crate::normalizer::Normalizer;
use crate::payloads::Manifest;
use crate::state_collector::StateCollector;
use cfkube_core::AuthInfo;
use cfkube_storage::Repositories;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct Orchestrator {
    repositories: Repositories,
    collector: StateCollector,
    normalizer: Normalizer,
    applier: Applier,
    apply_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(repositories: Repositories, default_domain_name: impl Into<String>) -> Self {
        Self {
            collector: StateCollector::new(repositories.clone()),
            normalizer: Normalizer::new(default_domain_name),
            applier: Applier::new(repositories.clone()),
            repositories,
            apply_timeout: None,
        }
    }

    /// Bounds a whole [`apply`](Self::apply) call. The in-flight store call
    /// is dropped when the deadline passes.
    pub fn with_apply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.apply_timeout = timeout;
        self
    }

    pub fn default_domain_name(&self) -> &str {
        self.normalizer.default_domain_name()
    }

    pub fn collector(&self) -> &StateCollector {
        &self.collector
    }

    /// Applies every application of `manifest` to the space. The first error
    /// aborts the call; applications already applied stay applied.
    #[instrument(
        skip_all,
        fields(space_guid = %space_guid, applications = manifest.applications.len())
    )]
    pub async fn apply(
        &self,
        auth: &AuthInfo,
        space_guid: &str,
        manifest: &Manifest,
    ) -> Result<()> {
        let run = self.apply_all(auth, space_guid, manifest);
        let Some(timeout) = self.apply_timeout else {
            return run.await;
        };

        match tokio::time::timeout(timeout, run).await {
            Ok(result) => result,
            Err(_) => {
                warn!(?timeout, "Manifest apply timed out");
                Err(ManifestError::DeadlineExceeded(timeout))
            }
        }
    }

    async fn apply_all(
        &self,
        auth: &AuthInfo,
        space_guid: &str,
        manifest: &Manifest,
    ) -> Result<()> {
        self.check_default_domain(auth).await?;

        for application in &manifest.applications {
            let observed = self
                .collector
                .collect_state(auth, &application.name, space_guid)
                .await
                .inspect_err(|err| {
                    warn!(app_name = %application.name, error = %err, "State collection failed")
                })?;

            let desired = self.normalizer.normalize(application, &observed);

            self.applier
                .apply(auth, space_guid, &desired, observed)
                .await
                .inspect_err(|err| {
                    warn!(app_name = %application.name, error = %err, "Apply failed")
                })?;

            info!(app_name = %application.name, "Applied application");
        }
        Ok(())
    }

    async fn check_default_domain(&self, auth: &AuthInfo) -> Result<()> {
        let name = self.default_domain_name();
        self.repositories
            .domains
            .get_domain_by_name(auth, name)
            .await
            .map_err(|err| {
                ManifestError::forbidden_as_not_found(err).as_unprocessable_entity(format!(
                    "The configured default domain {name:?} was not found"
                ))
            })?;
        Ok(())
    }
}
