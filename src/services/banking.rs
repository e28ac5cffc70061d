use serde::{Deserialize, Serialize};

use crate::api::banking::BankSearchHit;
use crate::api::ApiClient;
use crate::error::{AppError, Result};

/// Shortest IBAN in use (Norway). Inputs below this length are still being
/// typed and are not sent to the backend.
pub const MIN_IBAN_LEN: usize = 15;

/// Bank data confirmed by the backend. BIC and bank name are derived from
/// the IBAN and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBank {
    pub iban: String,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
}

pub struct BankResolver {
    api: ApiClient,
}

impl BankResolver {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validates an IBAN once it is long enough to be complete.
    ///
    /// Returns `Ok(None)` while the input is still too short; a complete but
    /// invalid IBAN is a validation error.
    pub async fn resolve_iban(&self, raw: &str) -> Result<Option<ResolvedBank>> {
        let iban = normalize_iban(raw);
        if iban.len() < MIN_IBAN_LEN {
            return Ok(None);
        }

        let validation = self.api.validate_iban(&iban).await?;
        if !validation.valid {
            return Err(AppError::Validation(format!("{} is not a valid IBAN", iban)));
        }

        Ok(Some(ResolvedBank {
            iban,
            bic: validation.bic,
            bank_name: validation.bank_name,
        }))
    }

    /// Converts a legacy account number + routing code (Kto/BLZ) pair.
    pub async fn resolve_account(&self, kto: &str, blz: &str) -> Result<ResolvedBank> {
        let kto = kto.trim();
        let blz = blz.trim();
        if kto.is_empty() || blz.is_empty() {
            return Err(AppError::Validation(
                "Account number and routing code are both required".to_string(),
            ));
        }

        let conversion = self.api.account_to_iban(kto, blz).await?;
        Ok(ResolvedBank {
            iban: conversion.iban,
            bic: conversion.bic,
            bank_name: conversion.bank_name,
        })
    }

    /// Free-text bank search for the name field. An empty query returns no
    /// results without a round trip.
    pub async fn search(&self, query: &str) -> Result<Vec<BankSearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.api.search_banks(query).await
    }
}

/// Uppercases and strips the grouping whitespace users paste in.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_iban() {
        assert_eq!(
            normalize_iban("de89 3704 0044 0532 0130 00"),
            "DE89370400440532013000"
        );
        assert_eq!(normalize_iban(" DE89"), "DE89");
    }
}
