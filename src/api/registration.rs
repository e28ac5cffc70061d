use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::client::ApiClient;
use crate::error::{AppError, Result};
use crate::wizard::submit::RegistrationPayload;

/// Highest step number of the public registration endpoint family.
pub const PUBLIC_FINAL_STEP: u8 = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct StepAck {
    pub step: u8,
    pub ok: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationReceipt {
    pub member_id: Uuid,
    #[serde(default)]
    pub family_member_ids: Vec<Uuid>,
}

impl ApiClient {
    /// Persists one intermediate step of the public flow server-side.
    pub async fn submit_public_step<B: Serialize>(&self, step: u8, body: &B) -> Result<StepAck> {
        if step == 0 || step > PUBLIC_FINAL_STEP {
            return Err(AppError::Validation(format!(
                "public registration has steps 1..={}, got {}",
                PUBLIC_FINAL_STEP, step
            )));
        }
        self.post_json(&format!("/public/register/step{}", step), body)
            .await
    }

    /// Final step of the public flow, carrying the assembled payload.
    pub async fn submit_public_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationReceipt> {
        self.post_json(&format!("/public/register/step{}", PUBLIC_FINAL_STEP), payload)
            .await
    }

    /// Admin-panel creation goes through the member collection directly.
    pub async fn submit_admin_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationReceipt> {
        self.post_json("/mitglieder", payload).await
    }
}
