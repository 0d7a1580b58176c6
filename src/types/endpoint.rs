// ABOUTME: Location of a remote container-runtime API.
// ABOUTME: Host and scheme are derived once from the URL and never change.

use std::fmt;
use thiserror::Error;
use url::Url;

use super::target::{Credentials, DEFAULT_SSH_PORT, RemoteTarget};

pub const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid runtime URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("unsupported runtime URL scheme: {0} (expected unix, tcp, http or ssh)")]
    UnsupportedScheme(String),

    #[error("runtime URL has no host: {0}")]
    MissingHost(String),

    #[error("runtime URL has no socket path: {0}")]
    MissingSocketPath(String),
}

/// How the runtime API is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Local unix socket.
    Unix,
    /// Plain TCP, spoken as HTTP.
    Tcp,
    Http,
    /// Remote unix socket tunnelled through an SSH session.
    Ssh,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Unix => write!(f, "unix"),
            Scheme::Tcp => write!(f, "tcp"),
            Scheme::Http => write!(f, "http"),
            Scheme::Ssh => write!(f, "ssh"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeEndpoint {
    url: Url,
    host: String,
    scheme: Scheme,
}

impl RuntimeEndpoint {
    /// Parse a runtime URL. A bare address such as `deploy@10.0.0.5` is read
    /// as `ssh://deploy@10.0.0.5`.
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let input = input.trim();
        let normalized = if input.contains("://") {
            input.to_string()
        } else {
            format!("ssh://{}", input)
        };

        let url = Url::parse(&normalized).map_err(|source| EndpointError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;

        let scheme = match url.scheme() {
            "unix" => Scheme::Unix,
            "tcp" => Scheme::Tcp,
            "http" => Scheme::Http,
            "ssh" => Scheme::Ssh,
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        };

        let host = match scheme {
            Scheme::Unix => {
                if url.path().is_empty() || url.path() == "/" {
                    return Err(EndpointError::MissingSocketPath(input.to_string()));
                }
                "localhost".to_string()
            }
            _ => url
                .host_str()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| EndpointError::MissingHost(input.to_string()))?
                .to_string(),
        };

        Ok(Self { url, host, scheme })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn username(&self) -> Option<&str> {
        Some(self.url.username()).filter(|u| !u.is_empty())
    }

    /// Socket path for `unix://` and `ssh://` endpoints.
    pub fn socket_path(&self) -> Option<&str> {
        match self.scheme {
            Scheme::Unix => Some(self.url.path()),
            Scheme::Ssh => match self.url.path() {
                "" | "/" => Some(DEFAULT_DOCKER_SOCKET),
                path => Some(path),
            },
            Scheme::Tcp | Scheme::Http => None,
        }
    }

    /// `host:port` address for TCP and HTTP endpoints, in the form bollard expects.
    pub fn http_address(&self) -> Option<String> {
        match self.scheme {
            Scheme::Tcp | Scheme::Http => Some(format!(
                "http://{}:{}",
                self.host,
                self.url.port().unwrap_or(2375)
            )),
            Scheme::Unix | Scheme::Ssh => None,
        }
    }

    /// The SSH target behind an `ssh://` endpoint.
    pub fn ssh_target(&self) -> Option<RemoteTarget> {
        if self.scheme != Scheme::Ssh {
            return None;
        }
        let credentials = self.username().map(|user| {
            let creds = Credentials::new(user);
            match self.url.password() {
                Some(password) => creds.with_password(password),
                None => creds,
            }
        });
        RemoteTarget::new(
            self.host.clone(),
            self.url.port().unwrap_or(DEFAULT_SSH_PORT),
            credentials,
        )
        .ok()
    }
}

impl fmt::Display for RuntimeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print an embedded password.
        let mut display = self.url.clone();
        if display.password().is_some() {
            let _ = display.set_password(Some("********"));
        }
        write!(f, "{}", display)
    }
}
