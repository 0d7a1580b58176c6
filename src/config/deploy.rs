// ABOUTME: Build and deploy settings.
// ABOUTME: Default image tag, stop grace period and equal-version handling.

use crate::deploy::{DEFAULT_STOP_TIMEOUT, DeployOptions};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default = "default_stop_timeout", with = "humantime_serde")]
    pub stop_timeout: Duration,

    #[serde(default)]
    pub allow_equal: bool,
}

fn default_tag() -> String {
    "latest".to_string()
}

fn default_stop_timeout() -> Duration {
    DEFAULT_STOP_TIMEOUT
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            tag: default_tag(),
            stop_timeout: default_stop_timeout(),
            allow_equal: false,
        }
    }
}

impl DeployConfig {
    pub fn options(&self) -> DeployOptions {
        DeployOptions {
            allow_equal: self.allow_equal,
            stop_timeout: self.stop_timeout,
        }
    }
}
