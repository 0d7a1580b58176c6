// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the containers the next step needs.

use super::cleanup::CleanupResult;
use crate::types::ContainerId;

/// Nothing inspected yet.
/// Available actions: `discover()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Running containers of the image have been sorted by version.
/// Available actions: `stop_superseded()`, `is_noop()`
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub(crate) superseded: Vec<ContainerId>,
    pub(crate) retained: Vec<ContainerId>,
    /// A retained container already running the candidate version.
    pub(crate) equal: Option<ContainerId>,
}

/// Superseded containers are stopped but still present.
/// Available actions: `start_new()`, `restore()`
#[derive(Debug, Clone, Default)]
pub struct Stopped {
    pub(crate) stopped: Vec<ContainerId>,
    pub(crate) retained: Vec<ContainerId>,
}

/// The new container is running.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) container: ContainerId,
    pub(crate) stopped: Vec<ContainerId>,
    pub(crate) retained: Vec<ContainerId>,
}

/// Stopped containers have been removed.
/// Available actions: `into_outcome()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) container: ContainerId,
    pub(crate) retained: Vec<ContainerId>,
    pub(crate) removed: CleanupResult,
}
