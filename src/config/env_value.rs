// ABOUTME: Secret-capable config values: a literal or an environment variable reference.
// ABOUTME: Lets passwords stay out of redeploy.yml.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

/// A string that may come from the environment:
/// `password: hunter2` or `password: { env: DEPLOY_PASSWORD, default: ... }`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        env: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn resolve(&self) -> Result<String> {
        let (env, default) = match self {
            EnvValue::Literal(value) => return Ok(value.clone()),
            EnvValue::FromEnv { env, default } => (env, default),
        };
        std::env::var(env)
            .ok()
            .or_else(|| default.clone())
            .ok_or_else(|| Error::MissingEnvVar(env.clone()))
    }
}

impl fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Literal(_) => f.write_str("EnvValue(<literal>)"),
            EnvValue::FromEnv { env, .. } => write!(f, "EnvValue(${})", env),
        }
    }
}
