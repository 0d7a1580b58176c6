// ABOUTME: Runtime connection error types with SNAFU pattern.
// ABOUTME: Unifies endpoint, tunnel and API connection failures for programmatic handling.

use snafu::Snafu;

use super::traits::DaemonError;
use crate::ssh;

/// Failure to reach a container runtime.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("{endpoint} needs SSH settings to open a tunnel"))]
    MissingSession { endpoint: String },

    #[snafu(display("SSH tunnel to {host} failed: {source}"))]
    Tunnel { host: String, source: ssh::Error },

    #[snafu(display("no runtime socket at {path} on {host}"))]
    SocketMissing { host: String, path: String },

    #[snafu(display("runtime connection failed: {source}"))]
    Connection { source: DaemonError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// The endpoint cannot be used with the supplied settings.
    Configuration,
    /// SSH connect, authentication or forwarding failed.
    Tunnel,
    /// The runtime socket is absent on the remote host.
    SocketMissing,
    /// The runtime API did not answer.
    ConnectionFailed,
    /// The runtime answered with an error.
    RuntimeOperation,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::MissingSession { .. } => RuntimeErrorKind::Configuration,
            RuntimeError::Tunnel { .. } => RuntimeErrorKind::Tunnel,
            RuntimeError::SocketMissing { .. } => RuntimeErrorKind::SocketMissing,
            RuntimeError::Connection { source } => match source {
                DaemonError::Unreachable(_) => RuntimeErrorKind::ConnectionFailed,
                DaemonError::Api(_) => RuntimeErrorKind::RuntimeOperation,
            },
        }
    }

    /// True when the runtime host could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self.kind(),
            RuntimeErrorKind::Tunnel
                | RuntimeErrorKind::SocketMissing
                | RuntimeErrorKind::ConnectionFailed
        )
    }
}

impl From<DaemonError> for RuntimeError {
    fn from(source: DaemonError) -> Self {
        RuntimeError::Connection { source }
    }
}
