use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MandateStatus {
    Active,
    Revoked,
    Expired,
}

/// SEPA direct-debit authorization for one member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SepaMandate {
    pub id: Uuid,
    pub member_id: Uuid,
    pub iban: String,
    pub bic: String,
    pub bank_name: Option<String>,
    pub account_holder: String,
    pub reference: String,
    pub status: MandateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SepaMandate {
    /// Only active mandates qualify a member for a collection run.
    pub fn is_active(&self) -> bool {
        self.status == MandateStatus::Active
    }
}
