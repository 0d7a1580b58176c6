// ABOUTME: Docker Engine API client implementing the runtime capability traits.
// ABOUTME: Reached over a unix socket (local or SSH-forwarded) or plain HTTP.

use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as ApiError;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    BuildImageOptions, CreateContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::{
    BuildOutput, ContainerError, ContainerFilters, ContainerOps, ContainerSpec, ContainerSummary,
    DaemonError, DaemonInfo, ImageDetails, ImageError, ImageOps, RuntimeInfo,
};
use crate::types::{ContainerId, ImageId, ImageReference};

/// Per-request timeout handed to bollard. Builds stream, so this bounds
/// silence rather than total build time.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP status and message of an API error response, if it was one.
fn api_status(e: &ApiError) -> Option<(u16, &str)> {
    match e {
        ApiError::DockerResponseServerError {
            status_code,
            message,
        } => Some((*status_code, message.as_str())),
        _ => None,
    }
}

/// Map an API error for an operation on `subject`. 404 means the subject is
/// missing except on create, where it is the image.
fn container_error(e: ApiError, subject: &str, creating: bool) -> ContainerError {
    match api_status(&e) {
        Some((404, message)) if creating => ContainerError::NoSuchImage(message.to_string()),
        Some((404, _)) => ContainerError::NoSuchContainer(subject.to_string()),
        Some((409, message)) if creating => ContainerError::NameConflict(message.to_string()),
        Some((304, _)) => ContainerError::AlreadyInState(subject.to_string()),
        _ => ContainerError::Api(e.to_string()),
    }
}

fn unreachable(e: ApiError) -> DaemonError {
    DaemonError::Unreachable(e.to_string())
}

fn non_empty(labels: &HashMap<String, String>) -> Option<HashMap<String, String>> {
    (!labels.is_empty()).then(|| labels.clone())
}

pub struct BollardRuntime {
    docker: Docker,
}

impl std::fmt::Debug for BollardRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BollardRuntime")
    }
}

impl BollardRuntime {
    pub fn new(docker: Docker) -> Self {
        BollardRuntime { docker }
    }

    pub fn connect_unix(socket: &str) -> Result<Self, DaemonError> {
        Docker::connect_with_unix(socket, REQUEST_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            .map(Self::new)
            .map_err(unreachable)
    }

    pub fn connect_http(address: &str) -> Result<Self, DaemonError> {
        Docker::connect_with_http(address, REQUEST_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            .map(Self::new)
            .map_err(unreachable)
    }

    /// `DOCKER_HOST`, or the platform's default socket.
    pub fn connect_local() -> Result<Self, DaemonError> {
        Docker::connect_with_local_defaults()
            .map(Self::new)
            .map_err(unreachable)
    }
}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<DaemonInfo, DaemonError> {
        let system = self.docker.info().await.map_err(unreachable)?;
        let version = self.docker.version().await.ok();
        Ok(DaemonInfo {
            product: "Docker".to_string(),
            version: system.server_version.unwrap_or_default(),
            api_version: version
                .and_then(|v| v.api_version)
                .unwrap_or_else(|| bollard::API_DEFAULT_VERSION.to_string()),
            os: system.operating_system.unwrap_or_default(),
            arch: system.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), DaemonError> {
        self.docker.ping().await.map(drop).map_err(unreachable)
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn build_image(
        &self,
        context: Bytes,
        reference: &ImageReference,
        labels: &HashMap<String, String>,
    ) -> Result<BuildOutput, ImageError> {
        let options = BuildImageOptions {
            t: Some(reference.to_string()),
            labels: non_empty(labels),
            rm: true,
            ..Default::default()
        };
        let mut events = self
            .docker
            .build_image(options, None, Some(bollard::body_full(context)));

        let mut output = BuildOutput::default();
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    output.log.push_str(&e.to_string());
                    return Err(ImageError::BuildFailed(output.log));
                }
            };
            if let Some(text) = event.stream {
                output.log.push_str(&text);
            }
            if let Some(status) = event.status {
                output.log.push_str(&status);
                output.log.push('\n');
            }
            if let Some(failure) = event.error_detail.and_then(|d| d.message) {
                output.log.push_str(&failure);
                return Err(ImageError::BuildFailed(output.log));
            }
            if let Some(id) = event.aux.and_then(|aux| aux.id) {
                output.image_id = Some(ImageId::new(id));
            }
        }
        Ok(output)
    }

    async fn inspect_image(&self, reference: &ImageReference) -> Result<ImageDetails, ImageError> {
        let name = reference.to_string();
        let image = self
            .docker
            .inspect_image(&name)
            .await
            .map_err(|e| match api_status(&e) {
                Some((404, _)) => ImageError::NoSuchImage(name.clone()),
                _ => ImageError::Api(format!("inspect {}: {}", name, e)),
            })?;
        Ok(ImageDetails {
            id: ImageId::new(image.id.unwrap_or_default()),
            size_bytes: image.size.and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
        })
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError> {
        let body = ContainerCreateBody {
            image: Some(spec.image.to_string()),
            labels: non_empty(&spec.labels),
            ..Default::default()
        };
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            ..Default::default()
        };
        let created = self
            .docker
            .create_container(Some(options), body)
            .await
            .map_err(|e| container_error(e, &spec.image.to_string(), true))?;
        for warning in &created.warnings {
            tracing::warn!(container = %created.id, "runtime warning: {}", warning);
        }
        Ok(ContainerId::new(created.id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.docker
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(|e| container_error(e, id.as_str(), false))
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        grace: Duration,
    ) -> Result<(), ContainerError> {
        let options = StopContainerOptions {
            t: Some(i32::try_from(grace.as_secs()).unwrap_or(i32::MAX)),
            signal: None,
        };
        self.docker
            .stop_container(id.as_str(), Some(options))
            .await
            .map_err(|e| container_error(e, id.as_str(), false))
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.docker
            .remove_container(id.as_str(), Some(options))
            .await
            .map_err(|e| container_error(e, id.as_str(), false))
    }

    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError> {
        let label_filters: Vec<String> = filters
            .labels
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        let options = ListContainersOptions {
            all: filters.all,
            filters: Some(HashMap::from([("label".to_string(), label_filters)])),
            ..Default::default()
        };
        let listed = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| ContainerError::Api(e.to_string()))?;

        Ok(listed
            .into_iter()
            .map(|c| ContainerSummary {
                id: ContainerId::new(c.id.unwrap_or_default()),
                name: c
                    .names
                    .and_then(|names| names.into_iter().next())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                state: c.state.map(|s| s.to_string()).unwrap_or_default(),
                status: c.status.unwrap_or_default(),
                created: c.created,
                labels: c.labels.unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(status_code: u16) -> ApiError {
        ApiError::DockerResponseServerError {
            status_code,
            message: format!("status {}", status_code),
        }
    }

    #[test]
    fn missing_image_on_create() {
        assert!(matches!(
            container_error(server_error(404), "api:1.0", true),
            ContainerError::NoSuchImage(_)
        ));
    }

    #[test]
    fn missing_container_elsewhere() {
        assert!(matches!(
            container_error(server_error(404), "c1", false),
            ContainerError::NoSuchContainer(id) if id == "c1"
        ));
    }

    #[test]
    fn not_modified_is_already_in_state() {
        assert!(matches!(
            container_error(server_error(304), "c1", false),
            ContainerError::AlreadyInState(_)
        ));
    }

    #[test]
    fn other_statuses_are_api_errors() {
        assert!(matches!(
            container_error(server_error(500), "c1", false),
            ContainerError::Api(_)
        ));
        assert!(matches!(
            container_error(server_error(409), "c1", false),
            ContainerError::Api(_)
        ));
    }
}
