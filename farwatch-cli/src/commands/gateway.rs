///! Gateway configuration commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use farwatch_client::ApiClient;

use crate::commands::confirm;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the gateway configuration documents
    Show,
    /// Show the dashboard defaults stored by the gateway
    Settings,
    /// Replace the gateway configuration with the given JSON documents
    Update {
        /// Paths to JSON documents, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

pub async fn handle_config_command(
    command: ConfigCommands,
    api: &ApiClient,
    format: OutputFormat,
    assume_yes: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let documents = api.gateway_config().await?;
            match format {
                OutputFormat::Table => {
                    for document in &documents {
                        println!("{}", document.pretty()?);
                    }
                }
                OutputFormat::Json | OutputFormat::Yaml => {
                    let texts: Vec<&str> =
                        documents.iter().map(|doc| doc.json.as_str()).collect();
                    output::print_single(&texts, format)?;
                }
            }
        }
        ConfigCommands::Settings => {
            let settings = api.dashboard_settings().await?;
            output::print_single(&settings, format)?;
        }
        ConfigCommands::Update { files } => {
            let mut documents = Vec::with_capacity(files.len());
            for path in &files {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                // Reject malformed documents before they reach the gateway.
                serde_json::from_str::<serde_json::Value>(&text)
                    .with_context(|| format!("{} is not valid JSON", path.display()))?;
                documents.push(text);
            }

            if !confirm(
                &format!("Replace the gateway configuration with {} document(s)?", documents.len()),
                assume_yes,
            )? {
                return Ok(());
            }

            api.update_gateway_config(&documents).await?;
            output::print_success("Gateway configuration updated");
        }
    }
    Ok(())
}
