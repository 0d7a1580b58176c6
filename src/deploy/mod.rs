// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct and the engine driving it.

mod cleanup;
mod deployment;
mod engine;
mod error;
mod outcome;
mod state;
mod transitions;

pub use cleanup::{CleanupFailure, CleanupResult};
pub use deployment::{DEFAULT_STOP_TIMEOUT, DeployOptions, Deployment};
pub use engine::DeploymentEngine;
pub use error::{DeployError, DeployErrorKind};
pub use outcome::DeployOutcome;
pub use state::{Completed, Discovered, Initialized, Started, Stopped};
pub use transitions::TransitionResult;
