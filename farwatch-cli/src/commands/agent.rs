///! Agent cluster commands

use std::collections::HashMap;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use farwatch_client::{fetch_clusters, ApiClient, Cluster};
use farwatch_common::NAME_LABEL;

use crate::commands::{confirm, parse_key_val};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List agents with connectivity and readiness
    List,
    /// Show one agent's record
    Show {
        /// Agent cluster ID
        id: String,
    },
    /// Set an agent's display name and labels
    Label {
        /// Agent cluster ID
        id: String,
        /// Display name; pass an empty string to remove it
        #[arg(short, long)]
        name: Option<String>,
        /// Labels as key=value pairs (repeatable)
        #[arg(short, long, value_parser = parse_key_val)]
        label: Vec<(String, String)>,
    },
    /// Remove an agent from the gateway
    Delete {
        /// Agent cluster ID
        id: String,
    },
}

#[derive(Tabled, Serialize)]
struct AgentRow {
    name: String,
    id: String,
    connected: String,
    ready: String,
    conditions: String,
}

impl From<&Cluster> for AgentRow {
    fn from(cluster: &Cluster) -> Self {
        Self {
            name: cluster.name().to_string(),
            id: cluster.id().to_string(),
            connected: output::yes_no(cluster.connected()),
            ready: output::yes_no(cluster.ready()),
            conditions: output::truncate(&cluster.conditions().join("; "), 60),
        }
    }
}

#[derive(Serialize)]
struct AgentDetails {
    id: String,
    name: String,
    labels: HashMap<String, String>,
    capabilities: Vec<String>,
}

pub async fn handle_agent_command(
    command: AgentCommands,
    api: &ApiClient,
    format: OutputFormat,
    assume_yes: bool,
) -> Result<()> {
    match command {
        AgentCommands::List => {
            let clusters = fetch_clusters(api).await?;
            let rows: Vec<AgentRow> = clusters.iter().map(AgentRow::from).collect();
            output::print_output(rows, format)?;
        }
        AgentCommands::Show { id } => {
            let record = api.get_cluster(&id).await?;
            let details = AgentDetails {
                id: record.id.clone(),
                name: record.display_name().to_string(),
                labels: record.metadata.labels.clone(),
                capabilities: record
                    .metadata
                    .capabilities
                    .iter()
                    .map(|c| c.name.clone())
                    .collect(),
            };
            output::print_single(&details, format)?;
        }
        AgentCommands::Label { id, name, label } => {
            let current = api.get_cluster(&id).await?;
            let mut labels = current.metadata.labels.clone();
            labels.extend(label);

            // No --name keeps whatever name label is already set.
            let name = match name {
                Some(name) => name,
                None => labels.get(NAME_LABEL).cloned().unwrap_or_default(),
            };

            api.update_cluster(&id, &name, labels).await?;
            output::print_success(&format!("Agent '{}' updated", id));
        }
        AgentCommands::Delete { id } => {
            if !confirm(&format!("Delete agent '{}'?", id), assume_yes)? {
                return Ok(());
            }
            api.delete_cluster(&id).await?;
            output::print_deleted("Agent", &id);
        }
    }
    Ok(())
}
