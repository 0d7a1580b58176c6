// ABOUTME: The label schema stamped on every container and image we create.
// ABOUTME: Labels are the only record of earlier deployments, so the keys are fixed.

use std::collections::HashMap;

use super::ImageReference;

/// Marks objects created by this tool.
pub const MANAGED_BY_LABEL: &str = "managed-by";
/// Image name the container was started from.
pub const IMAGE_LABEL: &str = "app.image";
/// Image tag the container was started from.
pub const TAG_LABEL: &str = "app.tag";
/// Value of [`MANAGED_BY_LABEL`].
pub const MANAGED_BY_VALUE: &str = "redeploy";

/// Labels attached to a container at creation time and read back at lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentLabels {
    image: String,
    tag: String,
}

impl DeploymentLabels {
    pub fn for_image(image: &ImageReference) -> Self {
        Self {
            image: image.name().to_string(),
            tag: image.tag().to_string(),
        }
    }

    /// Read the schema back from a container's labels.
    ///
    /// Returns `None` when the image label is absent; such containers are
    /// invisible to deployments. A missing tag is reported as `Some` with an
    /// empty tag so the caller can refuse to act on it.
    pub fn from_labels(labels: &HashMap<String, String>) -> Option<Self> {
        let image = labels.get(IMAGE_LABEL)?;
        Some(Self {
            image: image.clone(),
            tag: labels.get(TAG_LABEL).cloned().unwrap_or_default(),
        })
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string()),
            (IMAGE_LABEL.to_string(), self.image.clone()),
            (TAG_LABEL.to_string(), self.tag.clone()),
        ])
    }

    /// Label filter selecting every container started from `image_name`, any tag.
    pub fn image_filter(image_name: &str) -> HashMap<String, String> {
        HashMap::from([(IMAGE_LABEL.to_string(), image_name.to_string())])
    }

    /// Label filter selecting every container this tool created.
    pub fn managed_filter() -> HashMap<String, String> {
        HashMap::from([(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string())])
    }

    /// Labels for built images: only the ownership marker.
    pub fn image_build_labels() -> HashMap<String, String> {
        Self::managed_filter()
    }
}
