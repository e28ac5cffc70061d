use crate::api::client::ApiClient;
use crate::error::Result;
use crate::models::Tariff;

impl ApiClient {
    /// Full catalog including archived tariffs, for admin views.
    pub async fn list_tariffs(&self) -> Result<Vec<Tariff>> {
        self.get_json("/tarife").await
    }

    /// Catalog offered to public self-registration. The backend already
    /// excludes archived tariffs here.
    pub async fn list_public_tariffs(&self) -> Result<Vec<Tariff>> {
        self.get_json("/public/tarife").await
    }
}
