use uuid::Uuid;

use crate::api::client::ApiClient;
use crate::error::Result;
use crate::models::Contract;

impl ApiClient {
    pub async fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.get_json("/vertraege").await
    }

    pub async fn list_member_contracts(&self, member_id: Uuid) -> Result<Vec<Contract>> {
        self.get_json_with_query("/vertraege", &[("mitglied", member_id)])
            .await
    }

    pub async fn get_contract(&self, id: Uuid) -> Result<Contract> {
        self.get_json(&format!("/vertraege/{}", id)).await
    }
}
