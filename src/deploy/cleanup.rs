// ABOUTME: Best-effort batch operations over stopped containers.
// ABOUTME: Every container is attempted; failures are collected instead of aborting.

use crate::runtime::{ContainerError, ContainerOps};
use crate::types::ContainerId;
use serde::Serialize;

/// Aggregate result of a best-effort batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub succeeded: Vec<ContainerId>,
    pub failed: Vec<CleanupFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    pub container: ContainerId,
    pub error: String,
}

impl CleanupResult {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    fn record<E: std::fmt::Display>(&mut self, container: &ContainerId, result: Result<(), E>) {
        match result {
            Ok(()) => self.succeeded.push(container.clone()),
            Err(e) => self.failed.push(CleanupFailure {
                container: container.clone(),
                error: e.to_string(),
            }),
        }
    }
}

/// A stop of a stopped container or a start of a running one already has
/// the effect the caller wanted.
pub(crate) fn settled(result: Result<(), ContainerError>) -> Result<(), ContainerError> {
    match result {
        Err(ContainerError::AlreadyInState(id)) => {
            tracing::debug!(container = %id, "container already in the requested state");
            Ok(())
        }
        other => other,
    }
}

/// Remove every container in `containers`.
pub async fn remove_all<R: ContainerOps>(runtime: &R, containers: &[ContainerId]) -> CleanupResult {
    let mut result = CleanupResult::default();
    for id in containers {
        let outcome = runtime.remove_container(id, true).await;
        if let Err(e) = &outcome {
            tracing::warn!(container = %id.short(), "failed to remove superseded container: {}", e);
        } else {
            tracing::debug!(container = %id.short(), "removed superseded container");
        }
        result.record(id, outcome);
    }
    result
}

/// Start every container in `containers` again.
pub async fn restart_all<R: ContainerOps>(runtime: &R, containers: &[ContainerId]) -> CleanupResult {
    let mut result = CleanupResult::default();
    for id in containers {
        let outcome = settled(runtime.start_container(id).await);
        if let Err(e) = &outcome {
            tracing::warn!(container = %id.short(), "failed to restart container: {}", e);
        } else {
            tracing::info!(container = %id.short(), "restarted previous container");
        }
        result.record(id, outcome);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_in_state_counts_as_done() {
        assert!(settled(Err(ContainerError::AlreadyInState("c1".into()))).is_ok());
        assert!(matches!(
            settled(Err(ContainerError::NoSuchContainer("c1".into()))),
            Err(ContainerError::NoSuchContainer(_))
        ));
    }

    #[test]
    fn record_sorts_outcomes() {
        let mut result = CleanupResult::default();
        result.record(&ContainerId::new("a"), Ok::<(), String>(()));
        result.record(&ContainerId::new("b"), Err("gone"));

        assert_eq!(result.succeeded, vec![ContainerId::new("a")]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].error, "gone");
        assert_eq!(result.total(), 2);
        assert!(!result.is_clean());
    }

    #[test]
    fn empty_result_is_clean() {
        assert!(CleanupResult::default().is_clean());
    }
}
