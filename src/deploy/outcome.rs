// ABOUTME: The three ways a deployment can end without an abort.
// ABOUTME: A rollback is an outcome, not an error, until the caller asks for a Result.

use super::cleanup::CleanupResult;
use super::error::DeployError;
use crate::types::ContainerId;

#[derive(Debug)]
pub enum DeployOutcome {
    /// The new container runs; superseded containers were removed.
    StartedNew {
        container: ContainerId,
        /// Running containers left alone because they are not older.
        retained: Vec<ContainerId>,
        removed: CleanupResult,
    },
    /// The new container failed to start and stopped containers were restarted.
    RolledBack {
        cause: DeployError,
        restored: CleanupResult,
    },
    /// A container with the candidate version already runs and equal
    /// versions are allowed; nothing changed. Older containers of the same
    /// image that happen to run alongside it are left alone too.
    NoOp { running: ContainerId },
}

impl DeployOutcome {
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, DeployOutcome::RolledBack { .. })
    }

    /// Turn a rollback into the start failure that caused it.
    pub fn into_result(self) -> Result<DeployOutcome, DeployError> {
        match self {
            DeployOutcome::RolledBack { cause, .. } => Err(cause),
            outcome => Ok(outcome),
        }
    }
}
