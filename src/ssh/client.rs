// ABOUTME: An authenticated SSH session to one host.
// ABOUTME: Runs commands to completion and owns any socket tunnels opened through it.

use parking_lot::Mutex;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use std::sync::Arc;
use std::time::Duration;

use super::auth::Auth;
use super::config::SessionConfig;
use super::error::{Error, Result};
use super::forward::{self, ForwardHandle};
use super::host_keys::HostKeyPolicy;

/// Exit status and captured streams of a finished remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: u32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Accumulates channel messages until the command has both exited and
/// closed its output.
#[derive(Default)]
struct Collector {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit: Option<u32>,
    eof: bool,
}

impl Collector {
    /// Feed one message. Returns true once nothing more is expected.
    fn push(&mut self, msg: ChannelMsg) -> bool {
        match msg {
            ChannelMsg::Data { data } => self.stdout.extend_from_slice(&data),
            ChannelMsg::ExtendedData { data, ext: 1 } => self.stderr.extend_from_slice(&data),
            ChannelMsg::ExitStatus { exit_status } => self.exit = Some(exit_status),
            ChannelMsg::Eof => self.eof = true,
            ChannelMsg::Close => return true,
            _ => {}
        }
        self.eof && self.exit.is_some()
    }

    fn finish(self) -> Result<CommandOutput> {
        let exit_code = self.exit.ok_or(Error::ChannelClosed)?;
        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&self.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
        })
    }
}

pub struct Session {
    config: SessionConfig,
    handle: Arc<Handle<HostKeyPolicy>>,
    tunnels: Mutex<Vec<ForwardHandle>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("tunnels", &self.tunnels.lock().len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let auth = Auth::resolve(&config).await?;
        let client_config = client::Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        tracing::debug!(address = %config.address(), user = %config.user, "opening SSH session");
        let mut handle = client::connect(
            Arc::new(client_config),
            (config.host.as_str(), config.port),
            HostKeyPolicy::new(&config),
        )
        .await
        .map_err(|e| match e {
            russh::Error::UnknownKey => Error::HostKeyRejected(config.address()),
            other => Error::Connect {
                host: config.host.clone(),
                port: config.port,
                reason: other.to_string(),
            },
        })?;

        if !auth.login(&mut handle, &config.user).await? {
            return Err(Error::LoginRefused(config.user.clone()));
        }
        tracing::info!(address = %config.address(), user = %config.user, "SSH session open");

        Ok(Session {
            config,
            handle: Arc::new(handle),
            tunnels: Mutex::new(Vec::new()),
        })
    }

    pub fn user(&self) -> &str {
        &self.config.user
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Whether `path` exists on the remote host.
    pub async fn file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.exec(&format!("test -e '{}'", path)).await?.success())
    }

    /// Run `command` with the session's default timeout.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.exec_with_timeout(command, self.config.command_timeout).await
    }

    pub async fn exec_with_timeout(&self, command: &str, limit: Duration) -> Result<CommandOutput> {
        tracing::debug!(command, "remote exec");
        let output = tokio::time::timeout(limit, self.run(command))
            .await
            .map_err(|_| Error::Timeout(limit))??;
        tracing::debug!(command, exit_code = output.exit_code, "remote exec finished");
        Ok(output)
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::Exec(e.to_string()))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::Exec(e.to_string()))?;

        let mut collector = Collector::default();
        while let Some(msg) = channel.wait().await {
            if collector.push(msg) {
                break;
            }
        }
        collector.finish()
    }

    /// Tunnel a local Unix socket to `remote_socket` and return the local path.
    ///
    /// The local socket lives until [`Session::disconnect`].
    pub async fn forward_socket(&self, remote_socket: &str) -> Result<String> {
        let tunnel = forward::open(Arc::clone(&self.handle), remote_socket).await?;
        let path = tunnel
            .path()
            .ok_or_else(|| Error::Forward("local socket path is not UTF-8".into()))?
            .to_string();
        self.tunnels.lock().push(tunnel);
        Ok(path)
    }

    pub async fn disconnect(self) -> Result<()> {
        self.tunnels.lock().clear();
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await?;
        tracing::debug!(host = %self.config.host, "SSH session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use russh::CryptoVec;

    fn data(bytes: &[u8]) -> ChannelMsg {
        ChannelMsg::Data {
            data: CryptoVec::from_slice(bytes),
        }
    }

    #[test]
    fn waits_for_both_exit_status_and_eof() {
        let mut c = Collector::default();
        assert!(!c.push(data(b"hello ")));
        assert!(!c.push(ChannelMsg::ExitStatus { exit_status: 0 }));
        assert!(!c.push(data(b"world")));
        assert!(c.push(ChannelMsg::Eof));

        let output = c.finish().unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello world");
    }

    #[test]
    fn stderr_is_kept_apart() {
        let mut c = Collector::default();
        c.push(ChannelMsg::ExtendedData {
            data: CryptoVec::from_slice(b"boom"),
            ext: 1,
        });
        c.push(ChannelMsg::Eof);
        c.push(ChannelMsg::ExitStatus { exit_status: 3 });

        let output = c.finish().unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, "boom");
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn close_without_status_is_an_error() {
        let mut c = Collector::default();
        c.push(data(b"partial"));
        assert!(c.push(ChannelMsg::Close));
        assert!(matches!(c.finish(), Err(Error::ChannelClosed)));
    }
}
