// ABOUTME: Settings for opening one SSH session.
// ABOUTME: Built from a RemoteTarget plus whatever the config file adds.

use crate::types::{DEFAULT_SSH_PORT, RemoteTarget};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Remote commands may install packages, so the default allows for slow mirrors.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Where and how to log in.
///
/// Authentication is picked in order: password, explicit key file, the
/// running SSH agent, then the usual key files under `~/.ssh`.
#[derive(Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub key_path: Option<PathBuf>,
    /// Accept and record a host key that is not in known_hosts yet.
    pub trust_on_first_use: bool,
    /// Overrides `~/.ssh/known_hosts`.
    pub known_hosts: Option<PathBuf>,
    pub command_timeout: Duration,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        SessionConfig {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            user: user.into(),
            password: None,
            key_path: None,
            trust_on_first_use: false,
            known_hosts: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Settings for `target`, logging in as `fallback_user` when the target
    /// names nobody.
    pub fn for_target(target: &RemoteTarget, fallback_user: &str) -> Self {
        let mut config = Self::new(target.host(), target.username().unwrap_or(fallback_user));
        config.port = target.port();
        config.password = target.credentials().and_then(|c| c.password.clone());
        config
    }

    /// `host:port`, for messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("address", &self.address())
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<hidden>"))
            .field("key_path", &self.key_path)
            .field("trust_on_first_use", &self.trust_on_first_use)
            .field("known_hosts", &self.known_hosts)
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}
