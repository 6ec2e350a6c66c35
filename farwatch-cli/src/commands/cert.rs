///! Gateway certificate commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use farwatch_client::ApiClient;
use farwatch_common::CertInfo;

use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum CertCommands {
    /// List the gateway's serving certificate chain
    List,
    /// Print the fingerprint agents should pin when registering
    Fingerprint,
}

#[derive(Tabled, Serialize)]
struct CertRow {
    subject: String,
    issuer: String,
    ca: String,
    #[tabled(rename = "not after")]
    not_after: String,
    fingerprint: String,
}

impl From<&CertInfo> for CertRow {
    fn from(cert: &CertInfo) -> Self {
        Self {
            subject: cert.subject.clone(),
            issuer: cert.issuer.clone(),
            ca: output::yes_no(cert.is_ca),
            not_after: cert.not_after.clone(),
            fingerprint: output::truncate(&cert.fingerprint, 24),
        }
    }
}

pub async fn handle_cert_command(
    command: CertCommands,
    api: &ApiClient,
    format: OutputFormat,
) -> Result<()> {
    match command {
        CertCommands::List => {
            let certs = api.certs().await?;
            let rows: Vec<CertRow> = certs.iter().map(CertRow::from).collect();
            output::print_output(rows, format)?;
        }
        CertCommands::Fingerprint => match api.cluster_fingerprint().await? {
            Some(fingerprint) => println!("{}", fingerprint),
            None => output::print_warning("The gateway has no serving certificates"),
        },
    }
    Ok(())
}
