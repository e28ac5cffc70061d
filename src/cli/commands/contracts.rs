use anyhow::Result;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::cli::format;

#[derive(Subcommand, Debug)]
pub enum Contracts {
    /// List contracts, optionally for one member
    #[clap(name = "list")]
    List(ListContracts),
    /// Show one contract in full
    #[clap(name = "show")]
    Show(ShowContract),
}

impl Contracts {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        match self {
            Contracts::List(cmd) => cmd.run(client).await,
            Contracts::Show(cmd) => cmd.run(client).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListContracts {
    /// Restrict to one member's contracts
    #[clap(long)]
    pub member: Option<Uuid>,
}

impl ListContracts {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let contracts = match self.member {
            Some(member_id) => client.list_member_contracts(member_id).await?,
            None => client.list_contracts().await?,
        };

        println!("{} contracts.", contracts.len());
        println!(
            "{:<38} {:<38} {:>12} {:<10} {:<12} {:<12}",
            "ID", "Member", "Monthly", "Cycle", "Start", "End"
        );
        for contract in &contracts {
            println!(
                "{:<38} {:<38} {:>12} {:<10} {:<12} {:<12}",
                contract.id,
                contract.member_id,
                format::euros(contract.price_cents),
                format!("{:?}", contract.billing_cycle).to_lowercase(),
                contract.start_date,
                contract.end_date
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowContract {
    pub id: Uuid,
}

impl ShowContract {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let contract = client.get_contract(self.id).await?;
        println!("{}", serde_json::to_string_pretty(&contract)?);
        Ok(())
    }
}
