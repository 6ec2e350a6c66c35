///! Capability commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use farwatch_client::{capabilities_for, ApiClient, Capability, CapabilityState};
use farwatch_common::CapabilityKind;

use crate::commands::confirm;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum CapabilityCommands {
    /// List the capability catalog known to the gateway
    List,
    /// Show a capability's install state on every agent
    Status {
        /// Capability type (logging, monitoring, alerting)
        capability: CapabilityKind,
    },
    /// Install a capability on an agent
    Install {
        /// Capability type (logging, monitoring, alerting)
        capability: CapabilityKind,
        /// Agent cluster ID
        cluster: String,
    },
    /// Uninstall a capability from an agent
    Uninstall {
        /// Capability type (logging, monitoring, alerting)
        capability: CapabilityKind,
        /// Agent cluster ID
        cluster: String,
        /// Also delete the data the capability has stored
        #[arg(long)]
        delete_stored_data: bool,
    },
    /// Cancel a pending capability uninstall
    CancelUninstall {
        /// Capability type (logging, monitoring, alerting)
        capability: CapabilityKind,
        /// Agent cluster ID
        cluster: String,
    },
    /// Render the install command for registering a new agent
    Installer {
        /// Capability type (logging, monitoring, alerting)
        capability: CapabilityKind,
        /// Bootstrap token ID
        #[arg(short, long)]
        token: String,
        /// Certificate fingerprint pin
        #[arg(short, long)]
        pin: String,
    },
}

#[derive(Tabled, Serialize)]
struct CapabilityRow {
    cluster: String,
    id: String,
    status: String,
}

impl From<&Capability> for CapabilityRow {
    fn from(capability: &Capability) -> Self {
        Self {
            cluster: capability.cluster_name.clone(),
            id: capability.cluster_id.clone(),
            status: capability.state.to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct CatalogRow {
    name: String,
}

pub async fn handle_capability_command(
    command: CapabilityCommands,
    api: &ApiClient,
    format: OutputFormat,
    assume_yes: bool,
) -> Result<()> {
    match command {
        CapabilityCommands::List => {
            let catalog = api.capabilities().await?;
            let rows: Vec<CatalogRow> = catalog
                .into_iter()
                .map(|entry| CatalogRow { name: entry.name })
                .collect();
            output::print_output(rows, format)?;
        }
        CapabilityCommands::Status { capability } => {
            let mut statuses = capabilities_for(capability, api).await?;

            // Uninstalls in flight get their state refined from the task
            // status endpoint.
            for status in statuses.iter_mut() {
                if status.state == CapabilityState::Uninstalling {
                    let task = api.uninstall_status(&status.cluster_id, capability).await?;
                    *status = status.clone().refine(&task);
                }
            }

            let rows: Vec<CapabilityRow> = statuses.iter().map(CapabilityRow::from).collect();
            output::print_output(rows, format)?;
        }
        CapabilityCommands::Install {
            capability,
            cluster,
        } => {
            api.install_capability(&cluster, capability).await?;
            output::print_success(&format!(
                "Capability '{}' install requested on '{}'",
                capability, cluster
            ));
        }
        CapabilityCommands::Uninstall {
            capability,
            cluster,
            delete_stored_data,
        } => {
            let prompt = if delete_stored_data {
                format!(
                    "Uninstall '{}' from '{}' and delete its stored data?",
                    capability, cluster
                )
            } else {
                format!("Uninstall '{}' from '{}'?", capability, cluster)
            };
            if !confirm(&prompt, assume_yes)? {
                return Ok(());
            }

            api.uninstall_capability(&cluster, capability, delete_stored_data)
                .await?;
            output::print_success(&format!(
                "Capability '{}' uninstall requested on '{}'",
                capability, cluster
            ));
        }
        CapabilityCommands::CancelUninstall {
            capability,
            cluster,
        } => {
            api.cancel_uninstall(&cluster, capability).await?;
            output::print_success(&format!(
                "Uninstall of '{}' on '{}' canceled",
                capability, cluster
            ));
        }
        CapabilityCommands::Installer {
            capability,
            token,
            pin,
        } => {
            let command = api.capability_installer(capability, &token, &pin).await?;
            println!("{}", command);
        }
    }
    Ok(())
}
