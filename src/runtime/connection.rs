// ABOUTME: Scoped connection to the runtime behind a RuntimeEndpoint.
// ABOUTME: Opens an SSH tunnel for ssh:// endpoints and tears it down on close.

use snafu::{OptionExt, ResultExt};

use super::bollard::BollardRuntime;
use super::error::{
    MissingSessionSnafu, RuntimeError, SocketMissingSnafu, TunnelSnafu,
};
use super::traits::RuntimeInfo;
use crate::diagnostics::{Diagnostics, Warning};
use crate::ssh::{Session, SessionConfig};
use crate::types::{DEFAULT_DOCKER_SOCKET, RuntimeEndpoint, Scheme};

/// A live runtime client plus the SSH session carrying it, if any.
///
/// Callers must finish with [`RuntimeConnection::close`]; a session that is
/// only dropped never sends the SSH disconnect.
#[derive(Debug)]
pub struct RuntimeConnection {
    runtime: BollardRuntime,
    session: Option<Session>,
    endpoint: RuntimeEndpoint,
}

impl RuntimeConnection {
    /// Connect to `endpoint` and check the runtime answers a ping.
    ///
    /// `session` is required for `ssh://` endpoints and ignored otherwise.
    pub async fn open(
        endpoint: RuntimeEndpoint,
        session: Option<SessionConfig>,
    ) -> Result<Self, RuntimeError> {
        let (runtime, session) = match endpoint.scheme() {
            Scheme::Unix => {
                let path = endpoint.socket_path().unwrap_or(DEFAULT_DOCKER_SOCKET);
                (BollardRuntime::connect_unix(path)?, None)
            }
            Scheme::Tcp | Scheme::Http => {
                let address = endpoint
                    .http_address()
                    .unwrap_or_else(|| format!("http://{}:2375", endpoint.host()));
                (BollardRuntime::connect_http(&address)?, None)
            }
            Scheme::Ssh => {
                let config = session.context(MissingSessionSnafu {
                    endpoint: endpoint.to_string(),
                })?;
                let session = open_tunnel_session(&endpoint, config).await?;
                let socket = endpoint.socket_path().unwrap_or(DEFAULT_DOCKER_SOCKET);
                match forward_runtime_socket(&session, socket).await {
                    Ok(runtime) => (runtime, Some(session)),
                    Err(e) => {
                        let _ = session.disconnect().await;
                        return Err(e);
                    }
                }
            }
        };

        let connection = Self {
            runtime,
            session,
            endpoint,
        };

        if let Err(e) = connection.runtime.ping().await {
            connection.close(&mut Diagnostics::default()).await;
            return Err(e.into());
        }

        tracing::info!(endpoint = %connection.endpoint, "runtime reachable");
        Ok(connection)
    }

    pub fn runtime(&self) -> &BollardRuntime {
        &self.runtime
    }

    pub fn endpoint(&self) -> &RuntimeEndpoint {
        &self.endpoint
    }

    /// The SSH session tunnelling the runtime, for `ssh://` endpoints.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Release the connection. A failed SSH disconnect becomes a warning.
    pub async fn close(self, diag: &mut Diagnostics) {
        drop(self.runtime);
        if let Some(session) = self.session {
            let host = session.host().to_string();
            if let Err(e) = session.disconnect().await {
                diag.warn(Warning::ssh_disconnect(format!(
                    "failed to disconnect from {}: {}",
                    host, e
                )));
            }
        }
    }
}

async fn open_tunnel_session(
    endpoint: &RuntimeEndpoint,
    config: SessionConfig,
) -> Result<Session, RuntimeError> {
    Session::connect(config).await.context(TunnelSnafu {
        host: endpoint.host().to_string(),
    })
}

async fn forward_runtime_socket(
    session: &Session,
    socket: &str,
) -> Result<BollardRuntime, RuntimeError> {
    let host = session.host().to_string();
    let exists = session
        .file_exists(socket)
        .await
        .context(TunnelSnafu { host: host.clone() })?;
    if !exists {
        return SocketMissingSnafu {
            host,
            path: socket.to_string(),
        }
        .fail();
    }

    let local = session
        .forward_socket(socket)
        .await
        .context(TunnelSnafu { host })?;
    Ok(BollardRuntime::connect_unix(&local)?)
}
