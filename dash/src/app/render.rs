//! Terminal rendering of deployments and replica views

use chrono::{TimeZone, Utc};
use colored::Colorize;
use openapi_client::models::{Deployment, DeploymentState};

use crate::models::hardware::is_gpu_instance;
use crate::observe::aggregator::ReplicaView;
use crate::utils::truncate;

const MESSAGE_WIDTH: usize = 120;

pub fn render_deployments(deployments: &[Deployment]) -> String {
    if deployments.is_empty() {
        return "No deployments".dimmed().to_string();
    }

    let mut out = String::new();
    for deployment in deployments {
        let state = deployment.status.state.to_string();
        let state = match deployment.status.state {
            DeploymentState::Running => state.green(),
            DeploymentState::Starting | DeploymentState::Updating => state.yellow(),
            DeploymentState::NotReady | DeploymentState::Failed => state.red(),
            _ => state.normal(),
        };
        let shape = deployment
            .resource_requirement
            .resource_shape
            .as_deref()
            .unwrap_or("-");
        let gpu = if is_gpu_instance(Some(shape)) { " (gpu)" } else { "" };
        let created = Utc
            .timestamp_millis_opt(deployment.created_at)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{}  {}  {}{}  replicas: {}  photon: {}  {}\n",
            deployment.name.bold(),
            state,
            shape,
            gpu,
            deployment.resource_requirement.min_replicas,
            deployment.photon_id,
            created.dimmed(),
        ));
    }
    out
}

pub fn render_replica_view(deployment_id: &str, view: &ReplicaView) -> String {
    let mut out = format!("{} {}\n", "Deployment".bold(), deployment_id);

    if view.loading {
        out.push_str(&format!("{}\n", "Loading replicas...".dimmed()));
        return out;
    }
    if let Some(error) = &view.last_error {
        out.push_str(&format!("{} {}\n", "Refresh failed:".red(), error));
    }
    if view.rows.is_empty() {
        out.push_str(&format!("{}\n", "No replicas".dimmed()));
        return out;
    }

    for row in &view.rows {
        match row.issue_label() {
            Some(label) => out.push_str(&format!("  {}  {}\n", row.id(), label.red())),
            None => out.push_str(&format!("  {}  {}\n", row.id(), "ready".green())),
        }
        if view.is_expanded(row.id()) {
            for issue in &row.issues {
                out.push_str(&format!(
                    "    [{}] {}\n",
                    issue.reason.as_str().yellow(),
                    truncate(issue.display_message(), MESSAGE_WIDTH)
                ));
            }
        }
    }
    out
}
