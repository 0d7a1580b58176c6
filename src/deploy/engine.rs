// ABOUTME: Drives a deployment through discover, stop, start and resolve.
// ABOUTME: Rolls back to the stopped containers when the new one fails to start.

use super::Deployment;
use super::deployment::DeployOptions;
use super::error::DeployError;
use super::outcome::DeployOutcome;
use crate::runtime::ContainerOps;
use crate::types::ImageReference;

pub struct DeploymentEngine<'a, R: ContainerOps> {
    runtime: &'a R,
    options: DeployOptions,
}

impl<'a, R: ContainerOps> DeploymentEngine<'a, R> {
    pub fn new(runtime: &'a R, options: DeployOptions) -> Self {
        Self { runtime, options }
    }

    /// Replace superseded running containers of `image` with a new one.
    ///
    /// Errors are returned only when the run aborts: discovery problems
    /// (nothing changed yet) or a failed stop (already-stopped containers are
    /// restarted first). A failed start is reported as
    /// [`DeployOutcome::RolledBack`].
    pub async fn deploy(&self, image: &ImageReference) -> Result<DeployOutcome, DeployError> {
        let discovered = Deployment::new(image.clone(), self.options.clone())
            .discover(self.runtime)
            .await?;

        if discovered.is_noop()
            && let Some(running) = discovered.equal_container()
        {
            tracing::info!(image = %image, container = %running.short(), "version already running");
            return Ok(DeployOutcome::NoOp {
                running: running.clone(),
            });
        }

        let stopped = discovered.stop_superseded(self.runtime).await?;

        match stopped.start_new(self.runtime).await {
            Ok(started) => Ok(started.finish(self.runtime).await.into_outcome()),
            Err((stopped, cause)) => {
                tracing::warn!(image = %image, "rolling back: {}", cause);
                let restored = stopped.restore(self.runtime).await;
                Ok(DeployOutcome::RolledBack { cause, restored })
            }
        }
    }
}
