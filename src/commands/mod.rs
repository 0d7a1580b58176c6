// ABOUTME: Command module aggregator for the redeploy CLI.
// ABOUTME: One handler per subcommand plus shared service and connection helpers.

mod bootstrap;
mod build;
mod deploy;
mod runtime_connection;
mod status;

pub use bootstrap::{HostArgs, configure};
pub use build::build;
pub use deploy::{DeployArgs, deploy};
pub use status::status;

use redeploy::error::{Error, Result};
use redeploy::types::ImageReference;
use std::path::{Path, PathBuf};

/// Resolve each service directory into its image reference.
///
/// The image is named after the directory, so `./services/api` builds `api:<tag>`.
fn service_images(services: &[PathBuf], tag: &str) -> Result<Vec<(PathBuf, ImageReference)>> {
    services
        .iter()
        .map(|path| Ok((path.clone(), service_image(path, tag)?)))
        .collect()
}

fn service_image(path: &Path, tag: &str) -> Result<ImageReference> {
    let absolute = std::path::absolute(path)?;
    let name = absolute
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::InvalidConfig(format!("cannot derive an image name from {}", path.display()))
        })?;
    Ok(ImageReference::new(name, tag)?)
}
