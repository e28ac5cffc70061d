use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// SEPA direct debit, requires an active mandate.
    DirectDebit,
    BankTransfer,
    Cash,
}

/// A single accepted legal document with the version the member agreed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalAcceptance {
    pub accepted: bool,
    pub version: Option<String>,
}

impl LegalAcceptance {
    pub fn declined() -> Self {
        Self {
            accepted: false,
            version: None,
        }
    }

    pub fn accepted(version: &str) -> Self {
        Self {
            accepted: true,
            version: Some(version.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub member_id: Uuid,
    pub tariff_id: Uuid,
    pub billing_cycle: BillingCycle,
    pub payment_method: PaymentMethod,
    pub start_date: NaiveDate,
    /// Derived from start date + minimum term, never set independently.
    pub end_date: NaiveDate,
    pub minimum_term_months: u32,
    pub notice_period_months: u32,
    /// Monthly price in cents, denormalized from the tariff at signing so
    /// later tariff changes do not touch running contracts.
    pub price_cents: i64,
    pub admission_fee_cents: i64,
    pub terms: LegalAcceptance,
    pub privacy: LegalAcceptance,
    pub sepa_authorization: LegalAcceptance,
    /// Opt-in to immediate service start, which curtails the statutory
    /// 14-day withdrawal right (Widerrufsrecht).
    pub immediate_start: LegalAcceptance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
