// ABOUTME: Error types for image builds.
// ABOUTME: Context problems are caught locally; build failures keep the runtime's output.

use crate::runtime::ImageError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build context {0} does not exist")]
    ContextNotFound(PathBuf),

    #[error("build context {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to pack build context {path}: {source}")]
    Pack {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("build of {image} failed:\n{output}")]
    Build { image: String, output: String },

    #[error("runtime error while building {image}: {source}")]
    Runtime { image: String, source: ImageError },
}

impl BuildError {
    pub(crate) fn from_image_error(image: &str, err: ImageError) -> Self {
        match err {
            ImageError::BuildFailed(output) => BuildError::Build {
                image: image.to_string(),
                output,
            },
            source => BuildError::Runtime {
                image: image.to_string(),
                source,
            },
        }
    }
}
