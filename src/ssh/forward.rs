// ABOUTME: Unix socket tunnelling over an SSH session.
// ABOUTME: Lets a local runtime client talk to the remote Docker socket.

use super::host_keys::HostKeyPolicy;
use super::error::{Error, Result};
use russh::client::Handle;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

/// A local socket relaying to a socket on the remote host.
///
/// The listener task is aborted and the socket file removed when the handle
/// is dropped.
pub struct ForwardHandle {
    local_path: PathBuf,
    listener_task: JoinHandle<()>,
}

impl ForwardHandle {
    /// Local socket path, if it is valid UTF-8.
    pub fn path(&self) -> Option<&str> {
        self.local_path.to_str()
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

impl Drop for ForwardHandle {
    fn drop(&mut self) {
        self.listener_task.abort();
        let _ = std::fs::remove_file(&self.local_path);
    }
}

/// Bind a fresh local socket and relay every connection on it to
/// `remote_socket` through `direct-streamlocal` channels.
pub async fn open(handle: Arc<Handle<HostKeyPolicy>>, remote_socket: &str) -> Result<ForwardHandle> {
    let remote_socket = remote_socket.to_string();
    let local_path = next_socket_path();
    let _ = std::fs::remove_file(&local_path);

    let listener = UnixListener::bind(&local_path).map_err(|e| {
        Error::Forward(format!("cannot bind {}: {}", local_path.display(), e))
    })?;

    tracing::debug!(local = %local_path.display(), remote = %remote_socket, "forwarding socket");
    let listener_task = tokio::spawn(accept_loop(listener, handle, remote_socket));

    Ok(ForwardHandle {
        local_path,
        listener_task,
    })
}

fn next_socket_path() -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("redeploy-{}-{}.sock", std::process::id(), n))
}

async fn accept_loop(
    listener: UnixListener,
    handle: Arc<Handle<HostKeyPolicy>>,
    remote_socket: String,
) {
    loop {
        let stream = match listener.accept().await {
            Ok((stream, _)) => stream,
            Err(e) => {
                tracing::warn!("forwarded socket stopped accepting: {}", e);
                return;
            }
        };

        let handle = Arc::clone(&handle);
        let remote_socket = remote_socket.clone();
        tokio::spawn(async move {
            if let Err(e) = relay(stream, &handle, &remote_socket).await {
                tracing::debug!("forwarded connection ended: {}", e);
            }
        });
    }
}

async fn relay(
    mut local: UnixStream,
    handle: &Handle<HostKeyPolicy>,
    remote_socket: &str,
) -> Result<()> {
    let channel = handle
        .channel_open_direct_streamlocal(remote_socket)
        .await
        .map_err(|e| Error::Forward(format!("{}: {}", remote_socket, e)))?;

    let mut remote = channel.into_stream();
    let (sent, received) = tokio::io::copy_bidirectional(&mut local, &mut remote).await?;
    tracing::trace!(sent, received, "relay closed");
    Ok(())
}
