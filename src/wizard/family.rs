use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::member::age_on;
use crate::models::{Gender, Tariff};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FamilyError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A family member needs an email address or a username")]
    MissingContact,

    #[error("Email address {0} is already used within this registration")]
    DuplicateEmail(String),
}

/// A dependent member sharing address and bank details with the primary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub email: Option<String>,
    pub username: Option<String>,
    /// Selected from the catalog filtered for this member's age.
    pub tariff: Option<Tariff>,
}

impl FamilyMember {
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        age_on(self.birthdate, date)
    }
}

/// Raw form fields for a family member being added.
#[derive(Debug, Clone, Default)]
pub struct FamilyDraft {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub email: String,
    pub username: String,
    pub tariff: Option<Tariff>,
}

/// Collects dependents during registration and applies position-based
/// discounts. The primary member occupies position 1.
#[derive(Debug, Clone, Default)]
pub struct FamilyGroupBuilder {
    members: Vec<FamilyMember>,
    /// Set while the add-member sub-form is open; cleared on step change.
    pub add_in_progress: bool,
}

impl FamilyGroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn begin_add(&mut self) {
        self.add_in_progress = true;
    }

    pub fn cancel_add(&mut self) {
        self.add_in_progress = false;
    }

    /// Step-scoped transient state, dropped whenever the wizard changes step.
    pub fn reset_transient(&mut self) {
        self.add_in_progress = false;
    }

    /// Validates and adds a dependent. Duplicate emails are rejected both
    /// within the group and against the primary member's email.
    pub fn add(
        &mut self,
        draft: FamilyDraft,
        primary_email: Option<&str>,
    ) -> Result<(), FamilyError> {
        let first_name = required(&draft.first_name, "first_name")?;
        let last_name = required(&draft.last_name, "last_name")?;
        let birthdate = draft
            .birthdate
            .ok_or(FamilyError::MissingField("birthdate"))?;
        let gender = draft.gender.ok_or(FamilyError::MissingField("gender"))?;

        let email = non_empty(&draft.email);
        let username = non_empty(&draft.username);
        if email.is_none() && username.is_none() {
            return Err(FamilyError::MissingContact);
        }

        if let Some(email) = &email {
            let candidate = email.to_lowercase();
            let taken_by_primary = primary_email
                .map(|p| p.trim().to_lowercase() == candidate)
                .unwrap_or(false);
            let taken_in_group = self
                .members
                .iter()
                .filter_map(|m| m.email.as_deref())
                .any(|e| e.to_lowercase() == candidate);
            if taken_by_primary || taken_in_group {
                return Err(FamilyError::DuplicateEmail(email.clone()));
            }
        }

        self.members.push(FamilyMember {
            first_name,
            last_name,
            birthdate,
            gender,
            email,
            username,
            tariff: draft.tariff,
        });
        self.add_in_progress = false;

        Ok(())
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.members.len() {
            self.members.remove(index);
        }
    }

    /// Discount for the dependent at list index `i`. The primary is family
    /// position 1, so the first dependent sits at position 2.
    pub fn discount_for_index(&self, index: usize) -> u32 {
        discount_percent(index + 2)
    }
}

/// Discount tier by 1-based family position: 10% for the second member,
/// 15% for the third, 20% from the fourth onward.
pub fn discount_percent(position: usize) -> u32 {
    match position {
        0 | 1 => 0,
        2 => 10,
        3 => 15,
        _ => 20,
    }
}

/// `price − round(price × tier / 100)`, rounded half-up, never negative.
pub fn discounted_price_cents(price_cents: i64, percent: u32) -> i64 {
    let discount = (price_cents * percent as i64 + 50) / 100;
    (price_cents - discount).max(0)
}

fn required(value: &str, field: &'static str) -> Result<String, FamilyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FamilyError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
