use anyhow::Result;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::api::members::MemberUpdate;
use crate::api::ApiClient;
use crate::cli::format;
use crate::events::{AppEvent, EventBus};

#[derive(Subcommand, Debug)]
pub enum Members {
    /// List members
    #[clap(name = "list")]
    List(ListMembers),
    /// Show one member in full
    #[clap(name = "show")]
    Show(ShowMember),
    /// Update contact or status fields of a member
    #[clap(name = "update")]
    Update(UpdateMember),
    /// Archive (soft-delete) members
    #[clap(name = "archive")]
    Archive(ArchiveMembers),
}

impl Members {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        match self {
            Members::List(cmd) => cmd.run(client).await,
            Members::Show(cmd) => cmd.run(client).await,
            Members::Update(cmd) => cmd.run(client, bus).await,
            Members::Archive(cmd) => cmd.run(client, bus).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    /// Include archived members
    #[clap(long)]
    pub archived: bool,
}

impl ListMembers {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let members = client.list_members(self.archived).await?;
        println!("{} members.", members.len());
        format::print_member_header();
        for member in &members {
            format::print_member_row(member);
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    pub id: Uuid,
}

impl ShowMember {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let member = client.get_member(self.id).await?;
        println!("{}", serde_json::to_string_pretty(&member)?);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateMember {
    pub id: Uuid,
    #[clap(long)]
    pub email: Option<String>,
    #[clap(long)]
    pub phone: Option<String>,
    #[clap(long)]
    pub medical_notes: Option<String>,
    #[clap(long)]
    pub emergency_contact: Option<String>,
    /// Set the active flag (true/false)
    #[clap(long)]
    pub active: Option<bool>,
}

impl UpdateMember {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        let update = MemberUpdate {
            email: self.email,
            phone: self.phone,
            medical_notes: self.medical_notes,
            emergency_contact: self.emergency_contact,
            active: self.active,
            ..MemberUpdate::default()
        };
        let member = client.update_member(self.id, &update).await?;
        bus.publish(AppEvent::MembersChanged);
        println!("Updated {} ({}).", member.full_name(), member.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ArchiveMembers {
    /// Member IDs to archive
    #[clap(required = true)]
    pub ids: Vec<Uuid>,
}

impl ArchiveMembers {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        let archived = client.archive_members(&self.ids).await?;
        bus.publish(AppEvent::MembersChanged);
        println!("Archived {} members.", archived);
        Ok(())
    }
}
