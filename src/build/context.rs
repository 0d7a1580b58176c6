// ABOUTME: Packs a local build context directory into an in-memory tar archive.
// ABOUTME: The archive is what the runtime's build endpoint consumes.

use super::error::BuildError;
use bytes::Bytes;
use std::path::Path;

/// Archive every file under `dir`, with paths relative to `dir`.
pub async fn pack(dir: &Path) -> Result<Bytes, BuildError> {
    let metadata = match tokio::fs::metadata(dir).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BuildError::ContextNotFound(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(BuildError::Pack {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(BuildError::NotADirectory(dir.to_path_buf()));
    }

    let dir = dir.to_path_buf();
    let path = dir.clone();
    tokio::task::spawn_blocking(move || pack_blocking(&dir))
        .await
        .map_err(|e| BuildError::Pack {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?
        .map_err(|source| BuildError::Pack { path, source })
}

fn pack_blocking(dir: &Path) -> std::io::Result<Bytes> {
    let mut archive = tar::Builder::new(Vec::new());
    archive.append_dir_all(".", dir)?;
    let data = archive.into_inner()?;
    tracing::debug!(dir = %dir.display(), bytes = data.len(), "packed build context");
    Ok(Bytes::from(data))
}
