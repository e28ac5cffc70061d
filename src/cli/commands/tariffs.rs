use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::ApiClient;
use crate::cli::format;

#[derive(Subcommand, Debug)]
pub enum Tariffs {
    /// List the tariff catalog
    #[clap(name = "list")]
    List(ListTariffs),
}

impl Tariffs {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        match self {
            Tariffs::List(cmd) => cmd.run(client).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListTariffs {
    /// Show the public catalog instead of the full admin one
    #[clap(long)]
    pub public: bool,
}

impl ListTariffs {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let tariffs = if self.public {
            client.list_public_tariffs().await?
        } else {
            client.list_tariffs().await?
        };

        println!(
            "{:<25} {:>12} {:<10} {:>6} {:>7} {:<8}",
            "Name", "Monthly", "Cycle", "Term", "Notice", "Tag"
        );
        for tariff in &tariffs {
            let tag = match tariff.age_group {
                Some(group) => format!("{:?}", group).to_lowercase(),
                None => String::new(),
            };
            let name = if tariff.archived {
                format!("{} (archived)", tariff.name)
            } else {
                tariff.name.clone()
            };
            println!(
                "{:<25} {:>12} {:<10} {:>6} {:>7} {:<8}",
                name,
                format::euros(tariff.price_cents),
                format!("{:?}", tariff.billing_cycle).to_lowercase(),
                tariff.minimum_term_months,
                tariff.notice_period_months,
                tag
            );
        }
        Ok(())
    }
}
