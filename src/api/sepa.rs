use serde::Serialize;
use uuid::Uuid;

use crate::api::client::{ApiClient, Download};
use crate::error::Result;
use crate::models::{Member, SepaMandate};
use crate::wizard::terms;

/// One debit position of a collection run (Lastschriftlauf).
#[derive(Debug, Clone, Serialize)]
pub struct CollectionItem {
    pub member_id: Uuid,
    pub member_name: String,
    pub mandate_reference: String,
    pub iban: String,
    pub amount_cents: i64,
}

/// A member left out of the run, with the reason shown in the preview.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedMember {
    pub member_id: Uuid,
    pub member_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionRunPreview {
    pub items: Vec<CollectionItem>,
    pub skipped: Vec<SkippedMember>,
}

impl CollectionRunPreview {
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(|i| i.amount_cents).sum()
    }
}

impl ApiClient {
    pub async fn list_mandates(&self) -> Result<Vec<SepaMandate>> {
        self.get_json("/sepa-mandate").await
    }

    /// Builds the collection-run preview.
    ///
    /// Members without an active mandate are excluded from the run and listed
    /// with a reason; the actual SEPA file is generated server-side.
    pub async fn collection_run_preview(&self) -> Result<CollectionRunPreview> {
        let (members, mandates, contracts) = tokio::try_join!(
            self.list_members(false),
            self.list_mandates(),
            self.list_contracts(),
        )?;

        let mut preview = CollectionRunPreview {
            items: Vec::new(),
            skipped: Vec::new(),
        };

        for member in members.iter().filter(|m| m.active && !m.archived) {
            let mandate = mandates
                .iter()
                .find(|mandate| mandate.member_id == member.id);

            let mandate = match mandate {
                Some(m) if m.is_active() => m,
                Some(_) => {
                    preview.skipped.push(skipped(member, "mandate not active"));
                    continue;
                }
                None => {
                    preview.skipped.push(skipped(member, "no SEPA mandate"));
                    continue;
                }
            };

            let Some(contract) = contracts.iter().find(|c| c.member_id == member.id) else {
                preview.skipped.push(skipped(member, "no contract"));
                continue;
            };

            // Contract prices are stored per month; the run collects the
            // amount due for the contract's billing cycle.
            let amount_cents =
                terms::amount_per_cycle_cents(contract.price_cents, contract.billing_cycle);

            preview.items.push(CollectionItem {
                member_id: member.id,
                member_name: member.full_name(),
                mandate_reference: mandate.reference.clone(),
                iban: mandate.iban.clone(),
                amount_cents,
            });
        }

        Ok(preview)
    }

    /// Triggers the server-side SEPA file export and downloads the result.
    pub async fn export_collection_run(&self) -> Result<Download> {
        self.download("/sepa-mandate/export").await
    }
}

fn skipped(member: &Member, reason: &str) -> SkippedMember {
    SkippedMember {
        member_id: member.id,
        member_name: member.full_name(),
        reason: reason.to_string(),
    }
}
