// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use snafu::ResultExt;

use crate::runtime::{ContainerSpec, ContainerFilters, ContainerOps};
use crate::types::{ContainerId, DeploymentLabels};
use crate::version;

use super::Deployment;
use super::cleanup::{self, CleanupResult};
use super::error::{DeployError, DiscoverySnafu, MissingTagSnafu, VersionParseSnafu};
use super::outcome::DeployOutcome;
use super::state::{Completed, Discovered, Initialized, Started, Stopped};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

impl<S> Deployment<S> {
    fn with_state<T>(self, state: T) -> Deployment<T> {
        Deployment {
            image: self.image,
            options: self.options,
            state,
        }
    }
}

// =============================================================================
// Initialized -> Discovered
// =============================================================================

impl Deployment<Initialized> {
    /// List running containers of the candidate's image and decide which are superseded.
    ///
    /// Matching is by image name only; the tag label is read for the version
    /// decision. Any container whose tag cannot be compared aborts the run
    /// before anything is changed.
    #[must_use = "deployment state must be used"]
    pub async fn discover<R: ContainerOps>(
        self,
        runtime: &R,
    ) -> Result<Deployment<Discovered>, DeployError> {
        let name = self.image.name().to_string();
        let candidate = self.image.tag().to_string();
        let filters = ContainerFilters::running_with_labels(DeploymentLabels::image_filter(&name));

        let containers = runtime
            .list_containers(&filters)
            .await
            .context(DiscoverySnafu { image: name.clone() })?;

        let mut discovered = Discovered::default();
        for container in containers {
            // Runtimes are trusted to filter, but an unlabelled container must never be touched.
            if !filters.matches_labels(&container.labels) {
                continue;
            }
            let Some(labels) = DeploymentLabels::from_labels(&container.labels) else {
                continue;
            };
            if labels.tag().is_empty() {
                return MissingTagSnafu {
                    image: name,
                    container: container.id,
                }
                .fail();
            }

            let replace =
                version::should_replace(labels.tag(), &candidate, self.options.allow_equal)
                    .context(VersionParseSnafu {
                        image: name.clone(),
                        container: container.id.clone(),
                        tag: labels.tag(),
                        candidate: candidate.clone(),
                    })?;

            tracing::debug!(
                container = %container.id.short(),
                tag = labels.tag(),
                candidate = %candidate,
                replace,
                "version decision"
            );

            if replace {
                discovered.superseded.push(container.id);
            } else {
                if discovered.equal.is_none() && same_version(labels.tag(), &candidate) {
                    discovered.equal = Some(container.id.clone());
                }
                discovered.retained.push(container.id);
            }
        }

        tracing::info!(
            image = %self.image,
            superseded = discovered.superseded.len(),
            retained = discovered.retained.len(),
            "discovered running containers"
        );
        Ok(self.with_state(discovered))
    }
}

fn same_version(a: &str, b: &str) -> bool {
    matches!((version::parse(a), version::parse(b)), (Ok(a), Ok(b)) if a == b)
}

// =============================================================================
// Discovered -> Stopped
// =============================================================================

impl Deployment<Discovered> {
    /// Stop every superseded container, keeping it for a possible restore.
    ///
    /// If a stop fails, the containers already stopped in this call are
    /// started again before the error is returned.
    #[must_use = "deployment state must be used"]
    pub async fn stop_superseded<R: ContainerOps>(
        self,
        runtime: &R,
    ) -> Result<Deployment<Stopped>, DeployError> {
        let mut stopped: Vec<ContainerId> = Vec::new();

        for id in &self.state.superseded {
            let stop = runtime.stop_container(id, self.options.stop_timeout).await;
            if let Err(source) = cleanup::settled(stop) {
                tracing::warn!(container = %id.short(), "stop failed, restarting stopped containers");
                let restored = cleanup::restart_all(runtime, &stopped).await;
                return Err(DeployError::StopFailed {
                    container: id.clone(),
                    source,
                    restored,
                });
            }
            tracing::info!(container = %id.short(), "stopped superseded container");
            stopped.push(id.clone());
        }

        let retained = self.state.retained.clone();
        Ok(self.with_state(Stopped { stopped, retained }))
    }
}

// =============================================================================
// Stopped -> Started
// =============================================================================

impl Deployment<Stopped> {
    /// Create and start the container for the candidate image.
    ///
    /// A container that was created but failed to start is removed, so on
    /// error no new container is left behind.
    #[must_use = "deployment state must be used"]
    pub async fn start_new<R: ContainerOps>(self, runtime: &R) -> TransitionResult<Started, Stopped> {
        let labels = DeploymentLabels::for_image(&self.image).to_map();
        let config = ContainerSpec::new(self.image.clone(), labels);

        let container = match runtime.create_container(&config).await {
            Ok(id) => id,
            Err(source) => {
                let err = DeployError::StartFailure {
                    image: self.image.to_string(),
                    stage: "create",
                    source,
                };
                return Err((self, err));
            }
        };

        if let Err(source) = runtime.start_container(&container).await {
            if let Err(e) = runtime.remove_container(&container, true).await {
                tracing::warn!(container = %container.short(), "failed to remove unstarted container: {}", e);
            }
            let err = DeployError::StartFailure {
                image: self.image.to_string(),
                stage: "start",
                source,
            };
            return Err((self, err));
        }

        tracing::info!(image = %self.image, container = %container.short(), "started new container");
        let Stopped { stopped, retained } = self.state.clone();
        Ok(self.with_state(Started {
            container,
            stopped,
            retained,
        }))
    }

    /// Start the stopped containers again after a failed start.
    pub async fn restore<R: ContainerOps>(self, runtime: &R) -> CleanupResult {
        cleanup::restart_all(runtime, &self.state.stopped).await
    }
}

// =============================================================================
// Started -> Completed
// =============================================================================

impl Deployment<Started> {
    /// Remove the superseded containers now that the new one runs.
    pub async fn finish<R: ContainerOps>(self, runtime: &R) -> Deployment<Completed> {
        let removed = cleanup::remove_all(runtime, &self.state.stopped).await;
        let Started {
            container,
            retained,
            ..
        } = self.state.clone();
        self.with_state(Completed {
            container,
            retained,
            removed,
        })
    }
}

impl Deployment<Completed> {
    pub fn into_outcome(self) -> DeployOutcome {
        DeployOutcome::StartedNew {
            container: self.state.container,
            retained: self.state.retained,
            removed: self.state.removed,
        }
    }
}
