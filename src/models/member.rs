use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ADULT_AGE: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

/// Legal guardian, required for members under 18.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub iban: String,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
    pub address: Address,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub guardian: Option<Guardian>,
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub bank: Option<BankDetails>,
    pub active: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age_on(&self, date: NaiveDate) -> u32 {
        age_on(self.birthdate, date)
    }

    pub fn is_minor_on(&self, date: NaiveDate) -> bool {
        self.age_on(date) < ADULT_AGE
    }
}

/// Completed years between birthdate and the given date. A birthdate in the
/// future counts as age 0.
pub fn age_on(birthdate: NaiveDate, date: NaiveDate) -> u32 {
    date.years_since(birthdate).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_counts_completed_years() {
        let birth = date(2008, 6, 15);
        assert_eq!(age_on(birth, date(2026, 6, 14)), 17);
        assert_eq!(age_on(birth, date(2026, 6, 15)), 18);
    }

    #[test]
    fn test_future_birthdate_is_age_zero() {
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 1, 1)), 0);
    }
}
