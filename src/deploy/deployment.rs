// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use std::time::Duration;

use crate::types::{ContainerId, ImageReference};

use super::state::{Completed, Discovered, Initialized, Started, Stopped};

/// Seconds a superseded container gets to exit before it is killed.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Knobs for a single deployment.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// When true, a running container with the candidate's exact version is
    /// kept and the deployment becomes a no-op.
    pub allow_equal: bool,
    pub stop_timeout: Duration,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            allow_equal: false,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries the container ids the next step
/// operates on, so a step can only be called once its inputs exist.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) image: ImageReference,
    pub(crate) options: DeployOptions,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(image: ImageReference, options: DeployOptions) -> Self {
        Deployment {
            image,
            options,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    /// The candidate image.
    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    pub fn options(&self) -> &DeployOptions {
        &self.options
    }
}

impl Deployment<Discovered> {
    /// Running containers older than the candidate.
    pub fn superseded(&self) -> &[ContainerId] {
        &self.state.superseded
    }

    /// Running containers that will not be touched.
    pub fn retained(&self) -> &[ContainerId] {
        &self.state.retained
    }

    /// A container already runs the candidate version and equal versions are
    /// not redeployed.
    pub fn is_noop(&self) -> bool {
        self.options.allow_equal && self.state.equal.is_some()
    }

    pub fn equal_container(&self) -> Option<&ContainerId> {
        self.state.equal.as_ref()
    }
}

impl Deployment<Stopped> {
    pub fn stopped(&self) -> &[ContainerId] {
        &self.state.stopped
    }
}

impl Deployment<Started> {
    pub fn new_container(&self) -> &ContainerId {
        &self.state.container
    }

    pub fn stopped(&self) -> &[ContainerId] {
        &self.state.stopped
    }
}

impl Deployment<Completed> {
    pub fn new_container(&self) -> &ContainerId {
        &self.state.container
    }
}
