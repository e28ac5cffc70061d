use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::client::ApiClient;
use crate::error::Result;
use crate::models::{Address, BankDetails, Gender, Guardian, Member};

/// Fields an admin can change on the detail screen. Everything is optional;
/// omitted fields stay untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian: Option<Guardian>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Identity triple compared against existing records.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateQuery {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
}

/// Summary of an existing member returned by the comparison endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberMatch {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub archived: bool,
}

#[derive(Debug, Serialize)]
struct ArchiveRequest<'a> {
    member_ids: &'a [Uuid],
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    archived: usize,
}

impl ApiClient {
    pub async fn list_members(&self, include_archived: bool) -> Result<Vec<Member>> {
        self.get_json_with_query("/mitglieder", &[("archiviert", include_archived)])
            .await
    }

    pub async fn get_member(&self, id: Uuid) -> Result<Member> {
        self.get_json(&format!("/mitglieder/{}", id)).await
    }

    pub async fn update_member(&self, id: Uuid, update: &MemberUpdate) -> Result<Member> {
        self.put_json(&format!("/mitglieder/{}", id), update).await
    }

    /// Soft-deletes members in bulk. Returns the number archived.
    pub async fn archive_members(&self, member_ids: &[Uuid]) -> Result<usize> {
        let response: ArchiveResponse = self
            .post_json("/mitglieder/archivieren", &ArchiveRequest { member_ids })
            .await?;
        Ok(response.archived)
    }

    /// Compares name, birthdate and gender against existing records.
    pub async fn find_duplicates(&self, query: &DuplicateQuery) -> Result<Vec<MemberMatch>> {
        self.post_json("/mitglieder/duplikate", query).await
    }
}
