// ABOUTME: `build` command: build one image per service directory on the target runtime.
// ABOUTME: Services are built in order and the first failure stops the run.

use super::runtime_connection::connect_to_runtime;
use super::service_images;
use redeploy::build::{BuiltImage, ImageBuilder};
use redeploy::config::Config;
use redeploy::diagnostics::Diagnostics;
use redeploy::error::Result;
use redeploy::output::Output;
use redeploy::runtime::ImageOps;
use redeploy::types::ImageReference;
use std::path::PathBuf;

pub async fn build(
    url: &str,
    services: Vec<PathBuf>,
    tag: Option<&str>,
    config: &Config,
    mut output: Output,
) -> Result<()> {
    let services = config.services_or(services)?;
    let images = service_images(&Vec::from(services), config.tag_or(tag))?;

    output.start_timer();
    let connection = connect_to_runtime(url, config, &output).await?;
    let result = build_all(connection.runtime(), &images, &output).await;

    let mut diag = Diagnostics::default();
    connection.close(&mut diag).await;
    output.warnings(diag.warnings());

    let built = result?;
    output.success_with(&format!("Built {} image(s)", built.len()), Some(&built));
    Ok(())
}

async fn build_all<R: ImageOps>(
    runtime: &R,
    images: &[(PathBuf, ImageReference)],
    output: &Output,
) -> Result<Vec<BuiltImage>> {
    let builder = ImageBuilder::new(runtime);
    let mut built = Vec::with_capacity(images.len());

    for (path, image) in images {
        output.progress(&format!("  → Building {} from {}...", image, path.display()));
        let result = builder.build(path, image).await?;
        output.progress(&format!(
            "  ✓ {} ({}, {} bytes)",
            image,
            result.id.short(),
            result.size_bytes
        ));
        built.push(result);
    }

    Ok(built)
}
