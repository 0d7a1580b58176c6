// ABOUTME: Image build capability used by the image builder.
// ABOUTME: Takes a packed tar context and reports the runtime's build log.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use crate::types::{ImageId, ImageReference};

#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Build `context` (a tar archive with a Dockerfile at its root) and tag
    /// the result `reference`.
    async fn build_image(
        &self,
        context: Bytes,
        reference: &ImageReference,
        labels: &HashMap<String, String>,
    ) -> Result<BuildOutput, ImageError>;

    async fn inspect_image(&self, reference: &ImageReference) -> Result<ImageDetails, ImageError>;
}

/// A finished build.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub image_id: Option<ImageId>,
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetails {
    pub id: ImageId,
    pub size_bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("no such image: {0}")]
    NoSuchImage(String),

    /// Carries the build log verbatim.
    #[error("build failed:\n{0}")]
    BuildFailed(String),

    #[error("{0}")]
    Api(String),
}
