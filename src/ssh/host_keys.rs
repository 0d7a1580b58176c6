// ABOUTME: Server key verification against the known_hosts file.
// ABOUTME: Unknown keys are refused unless trust-on-first-use is switched on.

use russh::client;
use russh::keys::known_hosts;
use russh::keys::ssh_key::PublicKey;
use std::path::PathBuf;

use super::config::SessionConfig;

/// The russh client handler. Its only job is deciding whether to trust the
/// server's key.
pub struct HostKeyPolicy {
    host: String,
    port: u16,
    known_hosts: Option<PathBuf>,
    trust_unknown: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Known,
    Unknown,
    Changed,
}

impl HostKeyPolicy {
    pub fn new(config: &SessionConfig) -> Self {
        HostKeyPolicy {
            host: config.host.clone(),
            port: config.port,
            known_hosts: config.known_hosts.clone(),
            trust_unknown: config.trust_on_first_use,
        }
    }

    fn lookup(&self, key: &PublicKey) -> Verdict {
        let found = match &self.known_hosts {
            Some(path) => known_hosts::check_known_hosts_path(&self.host, self.port, key, path),
            None => known_hosts::check_known_hosts(&self.host, self.port, key),
        };
        match found {
            Ok(true) => Verdict::Known,
            Err(russh::keys::Error::KeyChanged { .. }) => Verdict::Changed,
            // A missing or unreadable file means the host is simply unknown.
            Ok(false) | Err(_) => Verdict::Unknown,
        }
    }

    fn remember(&self, key: &PublicKey) {
        let saved = match &self.known_hosts {
            Some(path) => known_hosts::learn_known_hosts_path(&self.host, self.port, key, path),
            None => known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        if let Err(e) = saved {
            tracing::warn!(host = %self.host, "could not record host key: {}", e);
        }
    }
}

impl client::Handler for HostKeyPolicy {
    type Error = russh::Error;

    async fn check_server_key(&mut self, key: &PublicKey) -> Result<bool, Self::Error> {
        match self.lookup(key) {
            Verdict::Known => Ok(true),
            Verdict::Changed => {
                tracing::error!(host = %self.host, port = self.port, "host key has changed");
                Ok(false)
            }
            Verdict::Unknown if self.trust_unknown => {
                tracing::warn!(host = %self.host, port = self.port, "trusting new host key");
                self.remember(key);
                Ok(true)
            }
            Verdict::Unknown => {
                tracing::debug!(host = %self.host, "host key not in known_hosts");
                Ok(false)
            }
        }
    }
}
