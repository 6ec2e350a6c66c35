///! Farwatch CLI
///!
///! Command-line interface for the farwatch management gateway

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use farwatch_client::ApiClient;

use commands::agent::AgentCommands;
use commands::capability::CapabilityCommands;
use commands::cert::CertCommands;
use commands::gateway::ConfigCommands;
use commands::role::RoleCommands;
use commands::role_binding::RoleBindingCommands;
use commands::token::TokenCommands;
use output::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Management gateway address (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage agent clusters
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Manage capabilities across the fleet
    Capability {
        #[command(subcommand)]
        command: CapabilityCommands,
    },
    /// Manage bootstrap tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Manage RBAC roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },
    /// Manage RBAC role bindings
    RoleBinding {
        #[command(subcommand)]
        command: RoleBindingCommands,
    },
    /// Inspect the gateway's serving certificates
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
    /// Manage the gateway configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load config
    let config = config::Config::load().unwrap_or_default();

    let server = cli.server.unwrap_or(config.default_server);
    let format = OutputFormat::from_str(cli.output.as_deref().unwrap_or(&config.default_output));

    // Initialize API client
    let api = ApiClient::new(&server);

    // Execute command
    match cli.command {
        Commands::Agent { command } => {
            commands::agent::handle_agent_command(command, &api, format, cli.yes).await?
        }
        Commands::Capability { command } => {
            commands::capability::handle_capability_command(command, &api, format, cli.yes).await?
        }
        Commands::Token { command } => {
            commands::token::handle_token_command(command, &api, format, cli.yes).await?
        }
        Commands::Role { command } => {
            commands::role::handle_role_command(command, &api, format, cli.yes).await?
        }
        Commands::RoleBinding { command } => {
            commands::role_binding::handle_role_binding_command(command, &api, format, cli.yes)
                .await?
        }
        Commands::Cert { command } => {
            commands::cert::handle_cert_command(command, &api, format).await?
        }
        Commands::Config { command } => {
            commands::gateway::handle_config_command(command, &api, format, cli.yes).await?
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Logs go to stderr so table/json output stays pipeable.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
