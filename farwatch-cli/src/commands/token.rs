///! Bootstrap token commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use farwatch_client::ApiClient;
use farwatch_common::{TokenCapability, TokenRecord};

use crate::commands::confirm;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum TokenCommands {
    /// List bootstrap tokens
    List,
    /// Create a bootstrap token
    Create {
        /// Time to live, in seconds
        #[arg(short, long, default_value = "3600")]
        ttl: String,
        /// Display name label for the token
        #[arg(short, long)]
        name: Option<String>,
        /// Capability granted to the token (repeatable)
        #[arg(short, long)]
        capability: Vec<String>,
    },
    /// Revoke a bootstrap token
    Revoke {
        /// Token ID
        id: String,
    },
}

#[derive(Tabled, Serialize)]
struct TokenRow {
    name: String,
    id: String,
    ttl: String,
    uses: u64,
}

impl From<&TokenRecord> for TokenRow {
    fn from(token: &TokenRecord) -> Self {
        Self {
            name: token.display_name().to_string(),
            id: token.token_id.clone(),
            ttl: token.ttl.clone(),
            uses: token.usage_count,
        }
    }
}

pub async fn handle_token_command(
    command: TokenCommands,
    api: &ApiClient,
    format: OutputFormat,
    assume_yes: bool,
) -> Result<()> {
    match command {
        TokenCommands::List => {
            let tokens = api.tokens().await?;
            let rows: Vec<TokenRow> = tokens.iter().map(TokenRow::from).collect();
            output::print_output(rows, format)?;
        }
        TokenCommands::Create {
            ttl,
            name,
            capability,
        } => {
            let capabilities = capability
                .into_iter()
                .map(|kind| TokenCapability {
                    kind,
                    reference: None,
                })
                .collect();

            let token = api.create_token(&ttl, name.as_deref(), capabilities).await?;
            output::print_created("Token", token.display_name(), &token.token_id);
            if let Some(secret) = &token.secret {
                println!("  Secret: {}", secret);
            }
        }
        TokenCommands::Revoke { id } => {
            if !confirm(&format!("Revoke token '{}'?", id), assume_yes)? {
                return Ok(());
            }
            api.delete_token(&id).await?;
            output::print_deleted("Token", &id);
        }
    }
    Ok(())
}
