// ABOUTME: SSH-reachable machine a bootstrap, build or deploy run is aimed at.
// ABOUTME: Parses "host", "user@host", "host:port" and "user@host:port".

use std::fmt;
use thiserror::Error;

pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("remote address cannot be empty")]
    Empty,

    #[error("hostname cannot be empty")]
    EmptyHost,

    #[error("username cannot be empty")]
    EmptyUser,

    #[error("invalid port: {0}")]
    InvalidPort(String),
}

/// Login credentials for a remote target.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

/// A remote machine reachable over SSH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl RemoteTarget {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        credentials: Option<Credentials>,
    ) -> Result<Self, TargetError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(TargetError::EmptyHost);
        }
        if credentials.as_ref().is_some_and(|c| c.username.is_empty()) {
            return Err(TargetError::EmptyUser);
        }
        Ok(Self {
            host: host.trim().to_string(),
            port,
            credentials,
        })
    }

    /// Parse `[user@]host[:port]`.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }

        let (user, rest) = match s.split_once('@') {
            Some((user, rest)) => (Some(user), rest),
            None => (None, s),
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| TargetError::InvalidPort(port.to_string()))?;
                (host, port)
            }
            None => (rest, DEFAULT_SSH_PORT),
        };

        Self::new(host, port, user.map(Credentials::new))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(user) = self.username() {
            write!(f, "{}@", user)?;
        }
        write!(f, "{}:{}", self.host, self.port)
    }
}
