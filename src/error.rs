// ABOUTME: Application-wide error type for redeploy.
// ABOUTME: Wraps every module error and classifies it into a small set of kinds.

use crate::bootstrap::BootstrapError;
use crate::build::BuildError;
use crate::deploy::{DeployError, DeployErrorKind};
use crate::runtime::{ContainerError, RuntimeError, RuntimeErrorKind};
use crate::ssh;
use crate::types::{EndpointError, ParseImageRefError, TargetError};
use crate::version::VersionParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid remote target: {0}")]
    Target(#[from] TargetError),

    #[error("invalid runtime URL: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("invalid image reference: {0}")]
    ImageRef(#[from] ParseImageRefError),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh::Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("container operation failed: {0}")]
    Container(#[from] ContainerError),

    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("deployment failed: {0}")]
    Deploy(#[from] DeployError),

    #[error("invalid version: {0}")]
    Version(#[from] VersionParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Broad failure categories, stable across module error changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The host or its runtime could not be reached.
    Connectivity,
    /// A remote command ran and failed.
    RemoteCommand,
    /// A version string could not be interpreted.
    VersionParse,
    /// An image build failed.
    Build,
    /// The new container could not be started.
    StartFailure,
    /// Bad flags, configuration file or environment.
    Config,
    /// The runtime rejected an operation.
    Runtime,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigNotFound(_)
            | Error::MissingEnvVar(_)
            | Error::InvalidConfig(_)
            | Error::Target(_)
            | Error::Endpoint(_)
            | Error::ImageRef(_)
            | Error::Io(_)
            | Error::Yaml(_) => ErrorKind::Config,
            Error::Ssh(e) => ssh_kind(e),
            Error::Runtime(e) => match e.kind() {
                RuntimeErrorKind::Configuration => ErrorKind::Config,
                RuntimeErrorKind::RuntimeOperation => ErrorKind::Runtime,
                RuntimeErrorKind::Tunnel
                | RuntimeErrorKind::SocketMissing
                | RuntimeErrorKind::ConnectionFailed => ErrorKind::Connectivity,
            },
            Error::Bootstrap(e) => match e {
                BootstrapError::Channel(e) => ssh_kind(e),
                BootstrapError::RemoteCommand { .. } => ErrorKind::RemoteCommand,
                BootstrapError::Version(_) => ErrorKind::VersionParse,
            },
            Error::Container(_) => ErrorKind::Runtime,
            Error::Build(_) => ErrorKind::Build,
            Error::Deploy(e) => match e.kind() {
                DeployErrorKind::Runtime => ErrorKind::Runtime,
                DeployErrorKind::VersionParse => ErrorKind::VersionParse,
                DeployErrorKind::StartFailure => ErrorKind::StartFailure,
            },
            Error::Version(_) => ErrorKind::VersionParse,
        }
    }
}

fn ssh_kind(e: &ssh::Error) -> ErrorKind {
    if e.is_connectivity() {
        ErrorKind::Connectivity
    } else {
        ErrorKind::RemoteCommand
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::DaemonError;

    #[test]
    fn bootstrap_errors_keep_their_kind() {
        let err = Error::from(BootstrapError::RemoteCommand {
            command: "docker install script".into(),
            exit_code: 100,
            stderr: "E: Unable to locate package".into(),
        });
        assert_eq!(err.kind(), ErrorKind::RemoteCommand);

        let err = Error::from(BootstrapError::Channel(ssh::Error::LoginRefused(
            "deploy".into(),
        )));
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn start_failure_is_its_own_kind() {
        let err = Error::from(DeployError::StartFailure {
            image: "svc:1.0.0".into(),
            stage: "start",
            source: ContainerError::Api("boom".into()),
        });
        assert_eq!(err.kind(), ErrorKind::StartFailure);
    }

    #[test]
    fn unreachable_runtime_is_connectivity() {
        let err = Error::from(RuntimeError::from(DaemonError::Unreachable(
            "no such socket".into(),
        )));
        assert_eq!(err.kind(), ErrorKind::Connectivity);
    }

    #[test]
    fn bad_version_is_version_parse() {
        let err = Error::from(VersionParseError::Empty);
        assert_eq!(err.kind(), ErrorKind::VersionParse);
    }
}
