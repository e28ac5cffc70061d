use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::ApiClient;
use crate::cli::format;

#[derive(Subcommand, Debug)]
pub enum Finance {
    /// Dashboard summary (members + contracts, fetched concurrently)
    #[clap(name = "summary")]
    Summary(Summary),
    /// Overdue invoices in the dunning process
    #[clap(name = "dunning")]
    Dunning(Dunning),
    /// Export the finance report as CSV
    #[clap(name = "export")]
    Export(ExportCsv),
}

impl Finance {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        match self {
            Finance::Summary(cmd) => cmd.run(client).await,
            Finance::Dunning(cmd) => cmd.run(client).await,
            Finance::Export(cmd) => cmd.run(client).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct Summary {}

impl Summary {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let summary = client.dashboard_summary().await?;
        println!("Active members:    {}", summary.active_members);
        println!("New this month:    {}", summary.new_this_month);
        println!("Active contracts:  {}", summary.active_contracts);
        println!("Monthly revenue:   {}", format::euros(summary.monthly_revenue_cents));
        println!("Average fee:       {}", format::euros(summary.average_fee_cents));
        println!("Open invoices:     {}", summary.open_invoices);
        println!("Overdue invoices:  {}", summary.overdue_invoices);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Dunning {}

impl Dunning {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let entries = client.list_dunning().await?;
        println!("{} overdue invoices.", entries.len());
        for entry in &entries {
            println!(
                "{:<30} {:>12} due {} (level {})",
                entry.member_name,
                format::euros(entry.amount_cents),
                entry.due_date,
                entry.reminder_level
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ExportCsv {
    /// Directory to write the export file into
    #[clap(long, default_value = ".")]
    pub out: PathBuf,
}

impl ExportCsv {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let download = client.export_finance_csv().await?;
        let path = self.out.join(&download.filename);
        std::fs::write(&path, &download.bytes)?;
        println!("Wrote {} ({} bytes).", path.display(), download.bytes.len());
        Ok(())
    }
}
