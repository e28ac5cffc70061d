use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contract::BillingCycle;
use crate::models::member::ADULT_AGE;

/// Eligibility tag on a tariff. Untagged tariffs are open to everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Kids,
    Youth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    pub id: Uuid,
    pub name: String,
    /// Price per month in minor currency units (cents).
    pub price_cents: i64,
    pub billing_cycle: BillingCycle,
    pub minimum_term_months: u32,
    pub notice_period_months: u32,
    pub age_group: Option<AgeGroup>,
    /// Archived tariffs stay valid for existing contracts but are excluded
    /// from new selection.
    pub archived: bool,
}

impl Tariff {
    /// Whether this tariff may be offered to a person of the given age.
    ///
    /// Minors see kids/youth tariffs plus untagged ones; adults see
    /// everything not tagged as a kids tariff.
    pub fn eligible_for_age(&self, age: u32) -> bool {
        if age < ADULT_AGE {
            true
        } else {
            self.age_group != Some(AgeGroup::Kids)
        }
    }
}

/// Filters a tariff catalog down to what a person of the given age may
/// select. Archived tariffs are never offered.
pub fn selectable_for_age(tariffs: &[Tariff], age: u32) -> Vec<&Tariff> {
    tariffs
        .iter()
        .filter(|t| !t.archived && t.eligible_for_age(age))
        .collect()
}
