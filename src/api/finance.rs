use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::client::{ApiClient, Download};
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct MemberStats {
    pub active_members: u64,
    pub new_this_month: u64,
    pub archived_members: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractStats {
    pub active_contracts: u64,
    pub monthly_revenue_cents: i64,
    pub open_invoices: u64,
    pub overdue_invoices: u64,
}

/// An overdue invoice as listed by the dunning (Mahnwesen) view.
#[derive(Debug, Clone, Deserialize)]
pub struct DunningEntry {
    pub invoice_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub reminder_level: u8,
}

/// Dashboard numbers derived after both statistic fetches completed.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub active_members: u64,
    pub new_this_month: u64,
    pub active_contracts: u64,
    pub monthly_revenue_cents: i64,
    pub open_invoices: u64,
    pub overdue_invoices: u64,
    /// Average monthly fee per contract in cents, 0 without contracts.
    pub average_fee_cents: i64,
}

impl DashboardSummary {
    pub fn derive(members: MemberStats, contracts: ContractStats) -> Self {
        let average_fee_cents = if contracts.active_contracts == 0 {
            0
        } else {
            contracts.monthly_revenue_cents / contracts.active_contracts as i64
        };

        Self {
            active_members: members.active_members,
            new_this_month: members.new_this_month,
            active_contracts: contracts.active_contracts,
            monthly_revenue_cents: contracts.monthly_revenue_cents,
            open_invoices: contracts.open_invoices,
            overdue_invoices: contracts.overdue_invoices,
            average_fee_cents,
        }
    }
}

impl ApiClient {
    pub async fn member_stats(&self) -> Result<MemberStats> {
        self.get_json("/finanzcockpit/mitglieder").await
    }

    pub async fn contract_stats(&self) -> Result<ContractStats> {
        self.get_json("/finanzcockpit/vertraege").await
    }

    /// Both statistic fetches run concurrently; the derived summary is only
    /// computed once both have completed.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let (members, contracts) = tokio::try_join!(self.member_stats(), self.contract_stats())?;
        Ok(DashboardSummary::derive(members, contracts))
    }

    pub async fn list_dunning(&self) -> Result<Vec<DunningEntry>> {
        self.get_json("/finanzcockpit/mahnungen").await
    }

    pub async fn export_finance_csv(&self) -> Result<Download> {
        self.download("/finanzcockpit/export/csv").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_fee_is_zero_without_contracts() {
        let summary = DashboardSummary::derive(
            MemberStats {
                active_members: 0,
                new_this_month: 0,
                archived_members: 0,
            },
            ContractStats {
                active_contracts: 0,
                monthly_revenue_cents: 0,
                open_invoices: 0,
                overdue_invoices: 0,
            },
        );
        assert_eq!(summary.average_fee_cents, 0);
    }

    #[test]
    fn test_average_fee_per_contract() {
        let summary = DashboardSummary::derive(
            MemberStats {
                active_members: 10,
                new_this_month: 2,
                archived_members: 1,
            },
            ContractStats {
                active_contracts: 4,
                monthly_revenue_cents: 12000,
                open_invoices: 3,
                overdue_invoices: 1,
            },
        );
        assert_eq!(summary.average_fee_cents, 3000);
    }
}
