// ABOUTME: Shared helper for connecting to the runtime named on the command line.
// ABOUTME: Resolves SSH settings from the config for ssh:// URLs.

use redeploy::config::Config;
use redeploy::error::Result;
use redeploy::output::Output;
use redeploy::runtime::{RuntimeConnection, RuntimeInfo};
use redeploy::types::RuntimeEndpoint;

/// Connect to the runtime at `url`, reporting progress.
pub async fn connect_to_runtime(
    url: &str,
    config: &Config,
    output: &Output,
) -> Result<RuntimeConnection> {
    let endpoint = RuntimeEndpoint::parse(url)?;
    output.progress(&format!("  → Connecting to {}...", endpoint));

    let session = match endpoint.ssh_target() {
        Some(target) => Some(config.ssh.session_config(&target)?),
        None => None,
    };
    let connection = RuntimeConnection::open(endpoint, session).await?;

    match connection.runtime().info().await {
        Ok(info) => output.progress(&format!(
            "  → Found {} {} ({}/{})",
            info.product, info.version, info.os, info.arch
        )),
        Err(e) => tracing::debug!("runtime info unavailable: {}", e),
    }

    Ok(connection)
}
