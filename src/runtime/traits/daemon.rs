// ABOUTME: Reachability and version queries against the runtime daemon.
// ABOUTME: Used to verify a connection before any real work starts.

use async_trait::async_trait;

#[async_trait]
pub trait RuntimeInfo: Send + Sync {
    async fn info(&self) -> Result<DaemonInfo, DaemonError>;

    async fn ping(&self) -> Result<(), DaemonError>;
}

#[derive(Debug, Clone)]
pub struct DaemonInfo {
    pub product: String,
    pub version: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// Nothing answered.
    #[error("runtime unreachable: {0}")]
    Unreachable(String),

    /// The daemon answered with an error.
    #[error("runtime returned an error: {0}")]
    Api(String),
}
