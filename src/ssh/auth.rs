// ABOUTME: Picks a login method for a session and performs it.
// ABOUTME: Password, explicit key, SSH agent, then default key files.

use russh::client::Handle;
use russh::keys::agent::client::AgentClient;
use russh::keys::ssh_key::PrivateKey;
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::UnixStream;

use super::config::SessionConfig;
use super::error::{Error, Result};
use super::host_keys::HostKeyPolicy;

const DEFAULT_KEY_FILES: [&str; 3] = ["id_ed25519", "id_ecdsa", "id_rsa"];

pub enum Auth {
    Password(String),
    Key(Arc<PrivateKey>),
    Agent(AgentClient<UnixStream>),
}

impl Auth {
    pub async fn resolve(config: &SessionConfig) -> Result<Auth> {
        if let Some(password) = &config.password {
            return Ok(Auth::Password(password.clone()));
        }
        if let Some(path) = &config.key_path {
            return read_key(path).map(Auth::Key);
        }
        if let Ok(agent) = AgentClient::connect_env().await {
            tracing::debug!("using SSH agent");
            return Ok(Auth::Agent(agent));
        }

        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| Error::NoCredentials("no agent and HOME is not set".into()))?;
        DEFAULT_KEY_FILES
            .iter()
            .map(|name| home.join(".ssh").join(name))
            .find_map(|path| read_key(&path).ok())
            .map(Auth::Key)
            .ok_or_else(|| Error::NoCredentials("no agent and no key in ~/.ssh".into()))
    }

    /// Try to log in as `user`. `Ok(false)` means the server said no.
    pub async fn login(self, handle: &mut Handle<HostKeyPolicy>, user: &str) -> Result<bool> {
        match self {
            Auth::Password(password) => {
                Ok(handle.authenticate_password(user, password).await?.success())
            }
            Auth::Key(key) => {
                let hash = handle.best_supported_rsa_hash().await?.flatten();
                let key = PrivateKeyWithHashAlg::new(key, hash);
                Ok(handle.authenticate_publickey(user, key).await?.success())
            }
            Auth::Agent(mut agent) => {
                let identities = agent
                    .request_identities()
                    .await
                    .map_err(|e| Error::NoCredentials(format!("agent: {}", e)))?;
                for identity in identities {
                    let accepted = handle
                        .authenticate_publickey_with(user, identity, None, &mut agent)
                        .await
                        .map(|r| r.success())
                        .unwrap_or(false);
                    if accepted {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

fn read_key(path: &Path) -> Result<Arc<PrivateKey>> {
    load_secret_key(path, None)
        .map(Arc::new)
        .map_err(|e| Error::KeyLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
