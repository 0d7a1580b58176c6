// ABOUTME: Remote command capability consumed by the bootstrapper.
// ABOUTME: Any transport that can run a shell command and report its exit status fits.

use async_trait::async_trait;

use super::client::{CommandOutput, Session};
use super::error::Result;

/// Runs shell commands on a remote host and waits for them to finish.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Run `command` and wait for its exit status.
    ///
    /// A non-zero exit is reported in the output, not as an error; errors are
    /// reserved for transport failures.
    async fn exec(&self, command: &str) -> Result<CommandOutput>;

    /// User the channel is logged in as, if known.
    fn remote_user(&self) -> Option<&str> {
        None
    }
}

#[async_trait]
impl CommandChannel for Session {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        Session::exec(self, command).await
    }

    fn remote_user(&self) -> Option<&str> {
        Some(self.user())
    }
}
