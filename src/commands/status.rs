// ABOUTME: `status` command: list every container redeploy manages on the target.
// ABOUTME: Shows image, tag, state and creation time per container.

use super::runtime_connection::connect_to_runtime;
use chrono::{DateTime, Utc};
use redeploy::config::Config;
use redeploy::diagnostics::Diagnostics;
use redeploy::error::Result;
use redeploy::output::Output;
use redeploy::runtime::{ContainerFilters, ContainerOps, ContainerSummary};
use redeploy::types::{ContainerId, DeploymentLabels};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusRow {
    id: ContainerId,
    name: String,
    image: String,
    tag: String,
    state: String,
    status: String,
    created: Option<DateTime<Utc>>,
}

impl StatusRow {
    fn from_summary(summary: ContainerSummary) -> Self {
        let labels = DeploymentLabels::from_labels(&summary.labels);
        Self {
            image: labels
                .as_ref()
                .map(|l| l.image().to_string())
                .unwrap_or_else(|| summary.image.clone()),
            tag: labels.map(|l| l.tag().to_string()).unwrap_or_default(),
            created: summary
                .created
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            id: summary.id,
            name: summary.name,
            state: summary.state,
            status: summary.status,
        }
    }

    fn line(&self) -> String {
        let created = self
            .created
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<12}  {:<30}  {:<8}  {:<20}  {}",
            self.id.short(),
            format!("{}:{}", self.image, self.tag),
            self.state,
            created,
            self.status
        )
    }
}

pub async fn status(url: &str, config: &Config, output: Output) -> Result<()> {
    let connection = connect_to_runtime(url, config, &output).await?;
    let result = list_managed(connection.runtime()).await;

    let mut diag = Diagnostics::default();
    connection.close(&mut diag).await;
    output.warnings(diag.warnings());

    let rows = result?;
    for row in &rows {
        output.item(&row.line(), row);
    }
    output.success(&format!("{} managed container(s)", rows.len()));
    Ok(())
}

async fn list_managed<R: ContainerOps>(runtime: &R) -> Result<Vec<StatusRow>> {
    let filters = ContainerFilters {
        labels: DeploymentLabels::managed_filter(),
        all: true,
    };
    let mut containers = runtime.list_containers(&filters).await?;
    containers.sort_by(|a, b| b.created.cmp(&a.created));
    Ok(containers.into_iter().map(StatusRow::from_summary).collect())
}
