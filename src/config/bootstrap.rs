// ABOUTME: Remote Docker bootstrap settings.
// ABOUTME: Minimum accepted Docker version and docker group handling.

use crate::bootstrap::{BootstrapOptions, script};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_min_version")]
    pub min_version: String,

    #[serde(default = "default_add_user_to_group")]
    pub add_user_to_group: bool,
}

fn default_min_version() -> String {
    script::DEFAULT_MIN_VERSION.to_string()
}

fn default_add_user_to_group() -> bool {
    true
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig {
            min_version: default_min_version(),
            add_user_to_group: default_add_user_to_group(),
        }
    }
}

impl BootstrapConfig {
    pub fn options(&self) -> BootstrapOptions {
        BootstrapOptions {
            min_version: self.min_version.clone(),
            add_user_to_group: self.add_user_to_group,
        }
    }
}
