///! RBAC role binding commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use farwatch_client::ApiClient;
use farwatch_common::RoleBinding;

use crate::commands::confirm;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum RoleBindingCommands {
    /// List role bindings
    List,
    /// Create a role binding
    Create {
        /// Role binding name
        id: String,
        /// Role to bind
        #[arg(short, long)]
        role: String,
        /// Subject granted the role (repeatable)
        #[arg(short, long)]
        subject: Vec<String>,
    },
    /// Delete a role binding
    Delete {
        /// Role binding name
        id: String,
    },
}

#[derive(Tabled, Serialize)]
struct RoleBindingRow {
    id: String,
    role: String,
    subjects: String,
}

impl From<&RoleBinding> for RoleBindingRow {
    fn from(binding: &RoleBinding) -> Self {
        Self {
            id: binding.id.clone(),
            role: binding.role_id.clone(),
            subjects: binding.subjects.join(", "),
        }
    }
}

pub async fn handle_role_binding_command(
    command: RoleBindingCommands,
    api: &ApiClient,
    format: OutputFormat,
    assume_yes: bool,
) -> Result<()> {
    match command {
        RoleBindingCommands::List => {
            let bindings = api.role_bindings().await?;
            let rows: Vec<RoleBindingRow> = bindings.iter().map(RoleBindingRow::from).collect();
            output::print_output(rows, format)?;
        }
        RoleBindingCommands::Create { id, role, subject } => {
            api.create_role_binding(&id, &role, subject).await?;
            output::print_success(&format!("Role binding '{}' created", id));
        }
        RoleBindingCommands::Delete { id } => {
            if !confirm(&format!("Delete role binding '{}'?", id), assume_yes)? {
                return Ok(());
            }
            api.delete_role_binding(&id).await?;
            output::print_deleted("Role binding", &id);
        }
    }
    Ok(())
}
