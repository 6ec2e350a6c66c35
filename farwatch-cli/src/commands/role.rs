///! RBAC role commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use farwatch_client::ApiClient;
use farwatch_common::Role;

use crate::commands::{confirm, parse_key_val};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum RoleCommands {
    /// List roles
    List,
    /// Create a role
    Create {
        /// Role name
        id: String,
        /// Cluster ID the role grants access to (repeatable)
        #[arg(short, long)]
        cluster: Vec<String>,
        /// Label selector as key=value pairs (repeatable)
        #[arg(short, long, value_parser = parse_key_val)]
        match_label: Vec<(String, String)>,
    },
    /// Delete a role
    Delete {
        /// Role name
        id: String,
    },
}

#[derive(Tabled, Serialize)]
struct RoleRow {
    id: String,
    clusters: String,
    selector: String,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        let mut selector: Vec<String> = role
            .match_labels
            .match_labels
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        selector.sort();

        Self {
            id: role.id.clone(),
            clusters: role.cluster_ids.join(", "),
            selector: selector.join(", "),
        }
    }
}

pub async fn handle_role_command(
    command: RoleCommands,
    api: &ApiClient,
    format: OutputFormat,
    assume_yes: bool,
) -> Result<()> {
    match command {
        RoleCommands::List => {
            let roles = api.roles().await?;
            let rows: Vec<RoleRow> = roles.iter().map(RoleRow::from).collect();
            output::print_output(rows, format)?;
        }
        RoleCommands::Create {
            id,
            cluster,
            match_label,
        } => {
            api.create_role(&id, cluster, match_label.into_iter().collect())
                .await?;
            output::print_success(&format!("Role '{}' created", id));
        }
        RoleCommands::Delete { id } => {
            if !confirm(&format!("Delete role '{}'?", id), assume_yes)? {
                return Ok(());
            }
            api.delete_role(&id).await?;
            output::print_deleted("Role", &id);
        }
    }
    Ok(())
}
