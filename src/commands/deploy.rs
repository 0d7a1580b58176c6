// ABOUTME: `deploy` command: roll out each service's image on the target runtime.
// ABOUTME: Reports removals and restores, and fails after a rollback.

use super::runtime_connection::connect_to_runtime;
use super::service_images;
use redeploy::config::Config;
use redeploy::deploy::{
    CleanupResult, DeployError, DeployOptions, DeployOutcome, DeploymentEngine,
};
use redeploy::diagnostics::{Diagnostics, Warning};
use redeploy::error::Result;
use redeploy::output::Output;
use redeploy::runtime::ContainerOps;
use redeploy::types::{ContainerId, ImageReference};
use serde::Serialize;
use std::path::PathBuf;

pub struct DeployArgs {
    pub url: String,
    pub services: Vec<PathBuf>,
    pub tag: Option<String>,
    pub skip_equal: bool,
}

/// Per-service result for JSON output.
#[derive(Serialize)]
struct DeploySummary<'a> {
    image: &'a ImageReference,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<&'a ContainerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed: Option<&'a CleanupResult>,
}

pub async fn deploy(args: DeployArgs, config: &Config, mut output: Output) -> Result<()> {
    let services = config.services_or(args.services)?;
    let images = service_images(&Vec::from(services), config.tag_or(args.tag.as_deref()))?;

    let mut options = config.deploy.options();
    options.allow_equal |= args.skip_equal;

    output.start_timer();
    let connection = connect_to_runtime(&args.url, config, &output).await?;

    let mut diag = Diagnostics::default();
    let result = deploy_all(connection.runtime(), &images, options, &output, &mut diag).await;

    connection.close(&mut diag).await;
    output.warnings(diag.warnings());

    let deployed = result?;
    output.success(&format!("Deployed {} service(s)", deployed));
    Ok(())
}

async fn deploy_all<R: ContainerOps>(
    runtime: &R,
    images: &[(PathBuf, ImageReference)],
    options: DeployOptions,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<usize> {
    let engine = DeploymentEngine::new(runtime, options);

    for (_, image) in images {
        output.progress(&format!("  → Deploying {}...", image));
        let outcome = match engine.deploy(image).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if let DeployError::StopFailed { restored, .. } = &e {
                    warn_unrestored(restored, diag);
                }
                return Err(e.into());
            }
        };
        report(image, &outcome, output, diag);
        outcome.into_result()?;
    }

    Ok(images.len())
}

fn report(image: &ImageReference, outcome: &DeployOutcome, output: &Output, diag: &mut Diagnostics) {
    match outcome {
        DeployOutcome::StartedNew {
            container,
            retained,
            removed,
        } => {
            for failure in &removed.failed {
                diag.warn(Warning::cleanup(format!(
                    "could not remove {}: {}",
                    failure.container.short(),
                    failure.error
                )));
            }
            if !retained.is_empty() {
                output.progress(&format!(
                    "  → Left {} newer or equal container(s) running",
                    retained.len()
                ));
            }
            output.item(
                &format!(
                    "  ✓ {} running as {} (removed {})",
                    image,
                    container.short(),
                    removed.succeeded.len()
                ),
                &DeploySummary {
                    image,
                    outcome: "started_new",
                    container: Some(container),
                    removed: Some(removed),
                },
            );
        }
        DeployOutcome::RolledBack { cause, restored } => {
            warn_unrestored(restored, diag);
            output.item(
                &format!(
                    "  ✗ {} failed to start ({}); restarted {} previous container(s)",
                    image,
                    cause,
                    restored.succeeded.len()
                ),
                &DeploySummary {
                    image,
                    outcome: "rolled_back",
                    container: None,
                    removed: None,
                },
            );
        }
        DeployOutcome::NoOp { running } => {
            output.item(
                &format!("  ✓ {} already running as {}", image, running.short()),
                &DeploySummary {
                    image,
                    outcome: "no_op",
                    container: Some(running),
                    removed: None,
                },
            );
        }
    }
}

fn warn_unrestored(restored: &CleanupResult, diag: &mut Diagnostics) {
    for failure in &restored.failed {
        diag.warn(Warning::restore(format!(
            "could not restart {}: {}",
            failure.container.short(),
            failure.error
        )));
    }
}
