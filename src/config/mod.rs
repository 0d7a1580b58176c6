// ABOUTME: Configuration types and parsing for redeploy.yml.
// ABOUTME: Handles discovery, YAML parsing, env var indirection and CLI overrides.

mod bootstrap;
mod deploy;
mod env_value;
mod ssh;

pub use bootstrap::BootstrapConfig;
pub use deploy::DeployConfig;
pub use env_value::EnvValue;
pub use ssh::SshConfig;

use crate::error::{Error, Result};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "redeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "redeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".redeploy/config.yml";

/// Settings read from `redeploy.yml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ssh: SshConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    /// Service build contexts used when none are given on the command line.
    #[serde(default)]
    pub services: Vec<PathBuf>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find the config file in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Load `explicit` if given, else discover in `dir`, else use defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::discover(dir) {
                Ok(config) => Ok(config),
                Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
                Err(e) => Err(e),
            },
        }
    }

    /// Services named on the command line, falling back to the file's list.
    pub fn services_or(&self, from_cli: Vec<PathBuf>) -> Result<NonEmpty<PathBuf>> {
        let services = if from_cli.is_empty() {
            self.services.clone()
        } else {
            from_cli
        };
        NonEmpty::from_vec(services).ok_or_else(|| {
            Error::InvalidConfig("no services given on the command line or in services".to_string())
        })
    }

    /// Image tag from the command line, falling back to the file's default.
    pub fn tag_or<'a>(&'a self, from_cli: Option<&'a str>) -> &'a str {
        from_cli.unwrap_or(&self.deploy.tag)
    }
}
