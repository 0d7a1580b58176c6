// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers discovery, version decisions, stopping and starting containers.

use snafu::Snafu;

use super::cleanup::CleanupResult;
use crate::runtime::ContainerError;
use crate::types::ContainerId;
use crate::version::VersionParseError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeployError {
    #[snafu(display("failed to list running containers of {image}: {source}"))]
    Discovery {
        image: String,
        source: ContainerError,
    },

    #[snafu(display("container {container} of {image} has no tag label"))]
    MissingTag {
        image: String,
        container: ContainerId,
    },

    #[snafu(display("cannot compare {image} tag {tag:?} (container {container}) with {candidate:?}: {source}"))]
    VersionParse {
        image: String,
        container: ContainerId,
        tag: String,
        candidate: String,
        source: VersionParseError,
    },

    #[snafu(display("failed to stop container {container}: {source}"))]
    StopFailed {
        container: ContainerId,
        source: ContainerError,
        /// Containers stopped earlier in the run, restarted before returning.
        restored: CleanupResult,
    },

    #[snafu(display("failed to {stage} container for {image}: {source}"))]
    StartFailure {
        image: String,
        stage: &'static str,
        source: ContainerError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// The runtime refused a listing or stop request.
    Runtime,
    /// A running container's tag could not be used for a version decision.
    VersionParse,
    /// The new container could not be created or started.
    StartFailure,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Discovery { .. } | DeployError::StopFailed { .. } => {
                DeployErrorKind::Runtime
            }
            DeployError::MissingTag { .. } | DeployError::VersionParse { .. } => {
                DeployErrorKind::VersionParse
            }
            DeployError::StartFailure { .. } => DeployErrorKind::StartFailure,
        }
    }

    /// True if nothing on the host was changed before the error.
    pub fn is_before_mutation(&self) -> bool {
        matches!(
            self,
            DeployError::Discovery { .. }
                | DeployError::MissingTag { .. }
                | DeployError::VersionParse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let start = DeployError::StartFailure {
            image: "svc:2.0.0".into(),
            stage: "start",
            source: ContainerError::Api("exit 1".into()),
        };
        assert_eq!(start.kind(), DeployErrorKind::StartFailure);
        assert!(!start.is_before_mutation());
        assert_eq!(
            start.to_string(),
            "failed to start container for svc:2.0.0: exit 1"
        );

        let missing = DeployError::MissingTag {
            image: "svc".into(),
            container: ContainerId::new("abc"),
        };
        assert_eq!(missing.kind(), DeployErrorKind::VersionParse);
        assert!(missing.is_before_mutation());
    }
}
