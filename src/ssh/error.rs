// ABOUTME: Errors raised by the SSH transport.
// ABOUTME: Separates "could not reach or log in" from "the session broke mid-command".

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot connect to {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("host key for {0} was rejected")]
    HostKeyRejected(String),

    #[error("login as {0} was refused")]
    LoginRefused(String),

    #[error("no usable SSH credentials: {0}")]
    NoCredentials(String),

    #[error("cannot read private key {path}: {reason}")]
    KeyLoad { path: PathBuf, reason: String },

    #[error("remote command could not be started: {0}")]
    Exec(String),

    #[error("remote command did not finish within {0:?}")]
    Timeout(Duration),

    #[error("channel closed before the command reported an exit status")]
    ChannelClosed,

    #[error("socket tunnel failed: {0}")]
    Forward(String),

    #[error(transparent)]
    Protocol(#[from] russh::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the remote side could not be reached or logged into at all.
    pub fn is_connectivity(&self) -> bool {
        !matches!(self, Error::Exec(_) | Error::Timeout(_) | Error::Forward(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
