// ABOUTME: In-memory container runtime implementing the capability traits.
// ABOUTME: Supports label filtering and per-operation failure injection.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use redeploy::runtime::{
    BuildOutput, ContainerError, ContainerFilters, ContainerOps, ContainerSpec, ContainerSummary,
    DaemonError, DaemonInfo, ImageDetails, ImageError, ImageOps, RuntimeInfo,
};
use redeploy::types::{ContainerId, DeploymentLabels, ImageId, ImageReference};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: ContainerId,
    pub image: String,
    pub labels: HashMap<String, String>,
    pub running: bool,
    pub created: i64,
}

#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub reference: ImageReference,
    pub context_len: usize,
    pub labels: HashMap<String, String>,
}

#[derive(Default)]
struct State {
    containers: Vec<FakeContainer>,
    images: HashMap<String, ImageDetails>,
    builds: Vec<BuildRequest>,
    calls: Vec<String>,
    next_id: u64,
    ignore_label_filters: bool,
    fail_create: HashSet<String>,
    fail_start_images: HashSet<String>,
    fail_start_ids: HashSet<ContainerId>,
    fail_stop: HashSet<ContainerId>,
    exit_before_stop: HashSet<ContainerId>,
    revive_before_start: HashSet<ContainerId>,
    fail_remove: HashSet<ContainerId>,
    fail_list: bool,
    build_failure: Option<String>,
}

impl State {
    fn allocate_id(&mut self) -> ContainerId {
        self.next_id += 1;
        ContainerId::new(format!("c{:04}", self.next_id))
    }

    fn container_mut(&mut self, id: &ContainerId) -> Result<&mut FakeContainer, ContainerError> {
        self.containers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ContainerError::NoSuchContainer(id.to_string()))
    }
}

#[derive(Default)]
pub struct FakeRuntime {
    state: Mutex<State>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a running container labelled as deployed from `image`.
    pub fn with_running(&self, image: &str) -> ContainerId {
        let reference = ImageReference::parse(image).unwrap();
        let labels = DeploymentLabels::for_image(&reference).to_map();
        self.add_container(image, labels, true)
    }

    /// Add a container with arbitrary labels.
    pub fn add_container(
        &self,
        image: &str,
        labels: HashMap<String, String>,
        running: bool,
    ) -> ContainerId {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        let created = 1_700_000_000 + state.next_id as i64;
        state.containers.push(FakeContainer {
            id: id.clone(),
            image: image.to_string(),
            labels,
            running,
            created,
        });
        id
    }

    pub fn ignore_label_filters(&self) {
        self.state.lock().ignore_label_filters = true;
    }

    pub fn fail_create_of(&self, image: &str) {
        self.state.lock().fail_create.insert(image.to_string());
    }

    /// Fail every start of a container created from `image`.
    pub fn fail_start_of(&self, image: &str) {
        self.state.lock().fail_start_images.insert(image.to_string());
    }

    pub fn fail_restart_of(&self, id: &ContainerId) {
        self.state.lock().fail_start_ids.insert(id.clone());
    }

    /// The container exits on its own just before the stop request lands.
    pub fn exit_before_stop(&self, id: &ContainerId) {
        self.state.lock().exit_before_stop.insert(id.clone());
    }

    /// Something else starts the container just before a start request lands.
    pub fn revive_before_start(&self, id: &ContainerId) {
        self.state.lock().revive_before_start.insert(id.clone());
    }

    pub fn fail_stop_of(&self, id: &ContainerId) {
        self.state.lock().fail_stop.insert(id.clone());
    }

    pub fn fail_remove_of(&self, id: &ContainerId) {
        self.state.lock().fail_remove.insert(id.clone());
    }

    pub fn fail_list(&self) {
        self.state.lock().fail_list = true;
    }

    pub fn fail_build_with(&self, log: &str) {
        self.state.lock().build_failure = Some(log.to_string());
    }

    pub fn container(&self, id: &ContainerId) -> Option<FakeContainer> {
        self.state.lock().containers.iter().find(|c| &c.id == id).cloned()
    }

    pub fn is_running(&self, id: &ContainerId) -> bool {
        self.container(id).is_some_and(|c| c.running)
    }

    pub fn exists(&self, id: &ContainerId) -> bool {
        self.container(id).is_some()
    }

    pub fn containers(&self) -> Vec<FakeContainer> {
        self.state.lock().containers.clone()
    }

    /// Running containers created from `image` (`name:tag`).
    pub fn running_of(&self, image: &str) -> Vec<ContainerId> {
        self.state
            .lock()
            .containers
            .iter()
            .filter(|c| c.running && c.image == image)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn builds(&self) -> Vec<BuildRequest> {
        self.state.lock().builds.clone()
    }

    /// Every runtime call in order, as `op` or `op:target`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Calls that changed something on the host.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("list") && !c.starts_with("inspect"))
            .collect()
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError> {
        let image = spec.image.to_string();
        let mut state = self.state.lock();
        state.calls.push(format!("create:{}", image));
        if state.fail_create.contains(&image) {
            return Err(ContainerError::NoSuchImage(image));
        }
        let id = state.allocate_id();
        let created = 1_700_000_000 + state.next_id as i64;
        state.containers.push(FakeContainer {
            id: id.clone(),
            image,
            labels: spec.labels.clone(),
            running: false,
            created,
        });
        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("start:{}", id));
        let fail_image = state
            .containers
            .iter()
            .find(|c| &c.id == id)
            .is_some_and(|c| state.fail_start_images.contains(&c.image));
        if fail_image || state.fail_start_ids.contains(id) {
            return Err(ContainerError::Api(format!(
                "container {} exited with code 1",
                id
            )));
        }
        let revive = state.revive_before_start.remove(id);
        let container = state.container_mut(id)?;
        if revive {
            container.running = true;
        }
        if container.running {
            return Err(ContainerError::AlreadyInState(id.to_string()));
        }
        container.running = true;
        Ok(())
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: Duration,
    ) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("stop:{}", id));
        if state.fail_stop.contains(id) {
            return Err(ContainerError::Api(format!("cannot stop {}", id)));
        }
        let exit = state.exit_before_stop.remove(id);
        let container = state.container_mut(id)?;
        if exit {
            container.running = false;
        }
        if !container.running {
            return Err(ContainerError::AlreadyInState(id.to_string()));
        }
        container.running = false;
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        state.calls.push(format!("remove:{}", id));
        if state.fail_remove.contains(id) {
            return Err(ContainerError::Api(format!("cannot remove {}", id)));
        }
        let index = state
            .containers
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ContainerError::NoSuchContainer(id.to_string()))?;
        if state.containers[index].running && !force {
            return Err(ContainerError::Api(id.to_string()));
        }
        state.containers.remove(index);
        Ok(())
    }

    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError> {
        let mut state = self.state.lock();
        state.calls.push("list".to_string());
        if state.fail_list {
            return Err(ContainerError::Api("daemon unavailable".to_string()));
        }
        let ignore_labels = state.ignore_label_filters;
        Ok(state
            .containers
            .iter()
            .filter(|c| filters.all || c.running)
            .filter(|c| ignore_labels || filters.matches_labels(&c.labels))
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                name: format!("/{}", c.id),
                image: c.image.clone(),
                state: if c.running { "running" } else { "exited" }.to_string(),
                status: if c.running { "Up" } else { "Exited (0)" }.to_string(),
                created: Some(c.created),
                labels: c.labels.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn build_image(
        &self,
        context: Bytes,
        reference: &ImageReference,
        labels: &HashMap<String, String>,
    ) -> Result<BuildOutput, ImageError> {
        let mut state = self.state.lock();
        state.calls.push(format!("build:{}", reference));
        state.builds.push(BuildRequest {
            reference: reference.clone(),
            context_len: context.len(),
            labels: labels.clone(),
        });
        if let Some(log) = &state.build_failure {
            return Err(ImageError::BuildFailed(log.clone()));
        }
        let id = ImageId::new(format!("sha256:{:064x}", state.builds.len()));
        state.images.insert(
            reference.to_string(),
            ImageDetails {
                id: id.clone(),
                size_bytes: context.len() as u64,
            },
        );
        Ok(BuildOutput {
            image_id: Some(id),
            log: format!("Successfully tagged {}\n", reference),
        })
    }

    async fn inspect_image(&self, reference: &ImageReference) -> Result<ImageDetails, ImageError> {
        let mut state = self.state.lock();
        state.calls.push(format!("inspect:{}", reference));
        state
            .images
            .get(&reference.to_string())
            .cloned()
            .ok_or_else(|| ImageError::NoSuchImage(reference.to_string()))
    }
}

#[async_trait]
impl RuntimeInfo for FakeRuntime {
    async fn info(&self) -> Result<DaemonInfo, DaemonError> {
        Ok(DaemonInfo {
            product: "fake".to_string(),
            version: "27.0.0".to_string(),
            api_version: "1.47".to_string(),
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
        })
    }

    async fn ping(&self) -> Result<(), DaemonError> {
        Ok(())
    }
}
