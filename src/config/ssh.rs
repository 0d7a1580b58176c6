// ABOUTME: SSH connection settings shared by every remote command.
// ABOUTME: Merges file settings with a RemoteTarget into a SessionConfig.

use super::EnvValue;
use crate::error::Result;
use crate::ssh::{DEFAULT_COMMAND_TIMEOUT, SessionConfig};
use crate::types::{DEFAULT_SSH_PORT, RemoteTarget};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct SshConfig {
    /// Port used when the target does not name one.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login user used when the target does not name one.
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<EnvValue>,

    #[serde(default)]
    pub key_path: Option<PathBuf>,

    #[serde(default)]
    pub trust_first_connection: bool,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_command_timeout() -> Duration {
    DEFAULT_COMMAND_TIMEOUT
}

impl Default for SshConfig {
    fn default() -> Self {
        SshConfig {
            port: default_port(),
            user: None,
            password: None,
            key_path: None,
            trust_first_connection: false,
            command_timeout: default_command_timeout(),
        }
    }
}

impl SshConfig {
    /// Session settings for `target`.
    ///
    /// User and password on the target win over the file; a target port other
    /// than 22 wins over the configured port.
    pub fn session_config(&self, target: &RemoteTarget) -> Result<SessionConfig> {
        let fallback_user = self.user.clone().unwrap_or_else(local_user);
        let mut config = SessionConfig::for_target(target, &fallback_user);
        config.trust_on_first_use = self.trust_first_connection;
        config.command_timeout = self.command_timeout;
        config.key_path = self.key_path.clone();

        if target.port() == DEFAULT_SSH_PORT {
            config.port = self.port;
        }
        if config.password.is_none()
            && let Some(password) = &self.password
        {
            config.password = Some(password.resolve()?);
        }
        Ok(config)
    }
}

fn local_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "root".to_string())
}
