// ABOUTME: Error types for remote runtime bootstrap.
// ABOUTME: Separates transport failures from commands that ran and failed.

use crate::ssh;
use crate::version::VersionParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("remote command channel failed: {0}")]
    Channel(#[from] ssh::Error),

    #[error("remote command `{command}` exited with status {exit_code}: {stderr}")]
    RemoteCommand {
        command: String,
        exit_code: u32,
        stderr: String,
    },

    #[error("cannot determine installed Docker version: {0}")]
    Version(#[from] VersionParseError),
}

impl BootstrapError {
    /// True when the host could not be reached, as opposed to a command failing on it.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, BootstrapError::Channel(e) if e.is_connectivity())
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
