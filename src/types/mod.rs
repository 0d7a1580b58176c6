// ABOUTME: Validated value types shared by bootstrap, build and deploy.
// ABOUTME: Ids, image references, the label schema, targets and endpoints.

mod endpoint;
mod id;
mod image_ref;
mod labels;
mod target;

pub use endpoint::{DEFAULT_DOCKER_SOCKET, EndpointError, RuntimeEndpoint, Scheme};
pub use id::{ContainerId, ImageId};
pub use image_ref::{ImageReference, ParseImageRefError};
pub use labels::{
    DeploymentLabels, IMAGE_LABEL, MANAGED_BY_LABEL, MANAGED_BY_VALUE, TAG_LABEL,
};
pub use target::{Credentials, DEFAULT_SSH_PORT, RemoteTarget, TargetError};
