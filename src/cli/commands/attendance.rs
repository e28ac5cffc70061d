use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::events::{AppEvent, EventBus};
use crate::models::AttendanceStatus;

#[derive(Subcommand, Debug)]
pub enum Attendance {
    /// List the roster of a class on a date
    #[clap(name = "list")]
    List(ListAttendance),
    /// Check a member in to a class
    #[clap(name = "checkin")]
    CheckIn(CheckIn),
    /// Check a member out again
    #[clap(name = "checkout")]
    CheckOut(CheckOut),
    /// Mark a record present, absent or removed
    #[clap(name = "mark")]
    Mark(Mark),
}

impl Attendance {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        match self {
            Attendance::List(cmd) => cmd.run(client).await,
            Attendance::CheckIn(cmd) => cmd.run(client, bus).await,
            Attendance::CheckOut(cmd) => cmd.run(client, bus).await,
            Attendance::Mark(cmd) => cmd.run(client, bus).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListAttendance {
    #[clap(long)]
    pub class: Uuid,
    #[clap(long)]
    pub date: NaiveDate,
}

impl ListAttendance {
    pub async fn run(self, client: &ApiClient) -> Result<()> {
        let records = client.list_attendance(self.class, self.date).await?;
        println!("{} records.", records.len());
        for record in &records {
            let times = match (record.checked_in_at, record.checked_out_at) {
                (Some(in_at), Some(out_at)) => {
                    format!("{} - {}", in_at.format("%H:%M"), out_at.format("%H:%M"))
                }
                (Some(in_at), None) => format!("{} -", in_at.format("%H:%M")),
                _ => String::new(),
            };
            println!(
                "{:<38} {:<10} {}",
                record.member_id,
                format!("{:?}", record.status).to_lowercase(),
                times
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CheckIn {
    #[clap(long)]
    pub member: Uuid,
    #[clap(long)]
    pub class: Uuid,
}

impl CheckIn {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        let record = client.check_in(self.member, self.class).await?;
        bus.publish(AppEvent::AttendanceChanged);
        println!("Checked in, record {}.", record.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CheckOut {
    pub record: Uuid,
}

impl CheckOut {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        let record = client.check_out(self.record).await?;
        bus.publish(AppEvent::AttendanceChanged);
        println!("Checked out, record {}.", record.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Mark {
    pub record: Uuid,
    /// present, absent or removed
    #[clap(value_enum)]
    pub status: MarkStatus,
    #[clap(long)]
    pub note: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum MarkStatus {
    Present,
    Absent,
    Removed,
}

impl From<MarkStatus> for AttendanceStatus {
    fn from(status: MarkStatus) -> Self {
        match status {
            MarkStatus::Present => AttendanceStatus::Present,
            MarkStatus::Absent => AttendanceStatus::Absent,
            MarkStatus::Removed => AttendanceStatus::Removed,
        }
    }
}

impl Mark {
    pub async fn run(self, client: &ApiClient, bus: &EventBus) -> Result<()> {
        let record = client
            .set_attendance_status(self.record, self.status.into(), self.note.as_deref())
            .await?;
        bus.publish(AppEvent::AttendanceChanged);
        println!(
            "Record {} is now {:?}.",
            record.id,
            record.status
        );
        Ok(())
    }
}
