// ABOUTME: Container lifecycle capability used by the deployment engine.
// ABOUTME: Label-filtered listing plus create, start, stop and remove by id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::types::{ContainerId, ImageReference};

#[async_trait]
pub trait ContainerOps: Send + Sync {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError>;

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Ask the container to exit, killing it after `grace`.
    async fn stop_container(&self, id: &ContainerId, grace: Duration)
    -> Result<(), ContainerError>;

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;

    /// Containers carrying every label in `filters`.
    ///
    /// Implementations may return extra containers; callers recheck labels
    /// with [`ContainerFilters::matches_labels`].
    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError>;
}

/// What to create. The runtime names the container when `name` is `None`.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub image: ImageReference,
    pub labels: HashMap<String, String>,
    pub name: Option<String>,
}

impl ContainerSpec {
    pub fn new(image: ImageReference, labels: HashMap<String, String>) -> Self {
        ContainerSpec {
            image,
            labels,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContainerFilters {
    pub labels: HashMap<String, String>,
    /// Include containers that are not running.
    pub all: bool,
}

impl ContainerFilters {
    pub fn running_with_labels(labels: HashMap<String, String>) -> Self {
        ContainerFilters { labels, all: false }
    }

    pub fn matches_labels(&self, labels: &HashMap<String, String>) -> bool {
        self.labels
            .iter()
            .all(|(key, wanted)| labels.get(key) == Some(wanted))
    }
}

#[derive(Debug, Clone)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub name: String,
    /// Image as the runtime reports it, usually `name:tag`.
    pub image: String,
    /// `running`, `exited`, `created` and so on.
    pub state: String,
    /// Human readable, e.g. `Up 3 hours`.
    pub status: String,
    /// Unix seconds.
    pub created: Option<i64>,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("no such container: {0}")]
    NoSuchContainer(String),

    #[error("no such image: {0}")]
    NoSuchImage(String),

    #[error("name already in use: {0}")]
    NameConflict(String),

    /// Start on a running container or stop on a stopped one.
    #[error("container {0} is already in that state")]
    AlreadyInState(String),

    #[error("{0}")]
    Api(String),
}
