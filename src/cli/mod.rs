pub mod commands;
pub mod format;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::events::EventBus;

use commands::{Attendance, Contracts, Finance, Members, Register, Sepa, Tariffs};

#[derive(Parser, Debug)]
#[clap(name = "dojoadmin", version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Admin tooling for the dojo membership backend")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Member records
    #[clap(subcommand)]
    Members(Members),
    /// Contracts and their terms
    #[clap(subcommand)]
    Contracts(Contracts),
    /// Tariff catalog
    #[clap(subcommand)]
    Tariffs(Tariffs),
    /// Attendance check-in and roster
    #[clap(subcommand)]
    Attendance(Attendance),
    /// SEPA mandates and collection runs
    #[clap(subcommand)]
    Sepa(Sepa),
    /// Finance dashboard and exports
    #[clap(subcommand)]
    Finance(Finance),
    /// Run a member/contract registration from an application file
    Register(Register),
}

impl Command {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        match self {
            Command::Members(cmd) => cmd.run(client, bus).await,
            Command::Contracts(cmd) => cmd.run(client).await,
            Command::Tariffs(cmd) => cmd.run(client).await,
            Command::Attendance(cmd) => cmd.run(client, bus).await,
            Command::Sepa(cmd) => cmd.run(client).await,
            Command::Finance(cmd) => cmd.run(client).await,
            Command::Register(cmd) => cmd.run(client, bus).await,
        }
    }
}
