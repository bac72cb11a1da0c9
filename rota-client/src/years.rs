//! Year endpoints

use crate::RotaClient;
use crate::error::Result;
use rota_core::domain::year::Year;
use rota_core::dto::year::CreateYear;

impl RotaClient {
    /// List all years
    pub async fn list_years(&self) -> Result<Vec<Year>> {
        let url = self.url("/api/years/");
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get a year by ID
    pub async fn get_year(&self, year_id: i64) -> Result<Year> {
        let url = self.url(&format!("/api/years/{}", year_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Create a year
    pub async fn create_year(&self, req: CreateYear) -> Result<Year> {
        let url = self.url("/api/years/");
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }
}
