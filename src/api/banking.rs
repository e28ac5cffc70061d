use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ValidateIbanRequest<'a> {
    iban: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IbanValidation {
    pub valid: bool,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct AccountConversionRequest<'a> {
    /// Local account number (Kontonummer).
    kto: &'a str,
    /// Routing code (Bankleitzahl).
    blz: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConversion {
    pub iban: String,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankSearchHit {
    pub name: String,
    pub bic: String,
    pub blz: Option<String>,
}

impl ApiClient {
    pub async fn validate_iban(&self, iban: &str) -> Result<IbanValidation> {
        self.post_json("/banken/validate-iban", &ValidateIbanRequest { iban })
            .await
    }

    /// Converts a legacy account number + routing code pair to an IBAN.
    pub async fn account_to_iban(&self, kto: &str, blz: &str) -> Result<AccountConversion> {
        self.post_json("/banken/kto-blz-to-iban", &AccountConversionRequest { kto, blz })
            .await
    }

    pub async fn search_banks(&self, query: &str) -> Result<Vec<BankSearchHit>> {
        self.get_json_with_query("/banken/search", &[("q", query)])
            .await
    }
}
