// ABOUTME: Builds a tagged image from a local context through the runtime.
// ABOUTME: Returns the identity and size the runtime reports for the result.

use super::context;
use super::error::BuildError;
use crate::runtime::ImageOps;
use crate::types::{DeploymentLabels, ImageId, ImageReference};
use serde::Serialize;
use std::path::Path;

/// An image the runtime has just built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltImage {
    pub reference: ImageReference,
    pub id: ImageId,
    pub size_bytes: u64,
}

pub struct ImageBuilder<'a, R: ImageOps> {
    runtime: &'a R,
}

impl<'a, R: ImageOps> ImageBuilder<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Build `image` from the directory at `context_path`.
    ///
    /// The image is tagged `name:tag` and labelled as managed; intermediate
    /// containers are removed by the runtime.
    pub async fn build(
        &self,
        context_path: &Path,
        image: &ImageReference,
    ) -> Result<BuiltImage, BuildError> {
        let archive = context::pack(context_path).await?;
        let name = image.to_string();

        tracing::info!(image = %name, context = %context_path.display(), "building image");
        let output = self
            .runtime
            .build_image(archive, image, &DeploymentLabels::image_build_labels())
            .await
            .map_err(|e| BuildError::from_image_error(&name, e))?;

        let details = self
            .runtime
            .inspect_image(image)
            .await
            .map_err(|e| BuildError::from_image_error(&name, e))?;

        if let Some(streamed) = &output.image_id
            && streamed != &details.id
        {
            tracing::debug!(streamed = %streamed, inspected = %details.id, "build id differs from tag");
        }

        tracing::info!(
            image = %name,
            id = %details.id.short(),
            size_bytes = details.size_bytes,
            "image built"
        );

        Ok(BuiltImage {
            reference: image.clone(),
            id: details.id,
            size_bytes: details.size_bytes,
        })
    }
}
