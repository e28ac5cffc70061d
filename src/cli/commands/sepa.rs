use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::ApiClient;
use crate::cli::format;

#[derive(Subcommand, Debug)]
pub enum Sepa {
    /// List direct-debit mandates
    #[clap(name = "mandates")]
    Mandates(ListMandates),
    /// Preview the next collection run
    #[clap(name = "preview")]
    Preview(PreviewRun),
    /// Export the SEPA file for the next collection run
    #[clap(name = "export")]
    Export(ExportRun),
}

impl Sepa {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        match self {
            Sepa::Mandates(cmd) => cmd.run(client).await,
            Sepa::Preview(cmd) => cmd.run(client).await,
            Sepa::Export(cmd) => cmd.run(client).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListMandates {}

impl ListMandates {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let mandates = client.list_mandates().await?;
        println!("{} mandates.", mandates.len());
        for mandate in &mandates {
            println!(
                "{:<20} {:<24} {:<30} {:?}",
                mandate.reference, mandate.iban, mandate.account_holder, mandate.status
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct PreviewRun {}

impl PreviewRun {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let preview = client.collection_run_preview().await?;

        println!("{} positions, {} total.", preview.items.len(), format::euros(preview.total_cents()));
        for item in &preview.items {
            println!(
                "{:<30} {:<20} {:>12}",
                item.member_name,
                item.mandate_reference,
                format::euros(item.amount_cents)
            );
        }

        if !preview.skipped.is_empty() {
            println!("\nSkipped ({}):", preview.skipped.len());
            for skipped in &preview.skipped {
                println!("{:<30} {}", skipped.member_name, skipped.reason);
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ExportRun {
    /// Directory to write the export file into
    #[clap(long, default_value = ".")]
    pub out: PathBuf,
}

impl ExportRun {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let download = client.export_collection_run().await?;
        let path = self.out.join(&download.filename);
        std::fs::write(&path, &download.bytes)?;
        println!("Wrote {} ({} bytes).", path.display(), download.bytes.len());
        Ok(())
    }
}
