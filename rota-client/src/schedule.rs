//! Schedule endpoints: assignments, clear, backups, restore and export

use crate::RotaClient;
use crate::error::Result;
use reqwest::header;
use rota_core::domain::assignment::AssignmentGrid;
use rota_core::domain::backup::BackupSummary;
use rota_core::dto::schedule::{
    ClearOutcome, ClearSchedule, RestoreOutcome, UpdateAssignment, UpdateOutcome,
};

/// A downloaded schedule export
#[derive(Debug, Clone)]
pub struct Export {
    /// Filename suggested by the server's `Content-Disposition`
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl RotaClient {
    // =============================================================================
    // Assignments
    // =============================================================================

    /// Get a year's assignment grid (resident → week → rotation code)
    pub async fn get_assignments(&self, year_id: i64) -> Result<AssignmentGrid> {
        let url = self.url("/api/schedule/assignments");
        let response = self
            .client
            .get(&url)
            .query(&[("year_id", year_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Set one cell; an empty code unassigns it
    pub async fn update_assignment(&self, req: UpdateAssignment) -> Result<UpdateOutcome> {
        let url = self.url("/api/schedule/assignment");
        let response = self.client.put(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Clear / Backup / Restore
    // =============================================================================

    /// Clear a year (or one resident's row); the server backs it up first
    pub async fn clear_schedule(&self, req: ClearSchedule) -> Result<ClearOutcome> {
        let url = self.url("/api/schedule/clear");
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// List a year's backups, newest first
    pub async fn list_backups(&self, year_id: i64) -> Result<Vec<BackupSummary>> {
        let url = self.url("/api/schedule/backups");
        let response = self
            .client
            .get(&url)
            .query(&[("year_id", year_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Restore a backup over the current assignments in its scope
    pub async fn restore_backup(&self, backup_id: i64) -> Result<RestoreOutcome> {
        let url = self.url(&format!("/api/schedule/restore/{}", backup_id));
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Export
    // =============================================================================

    /// Download a year's schedule as a spreadsheet
    pub async fn export_schedule(&self, year_id: i64) -> Result<Export> {
        let url = self.url("/api/export/excel");
        let response = self
            .client
            .get(&url)
            .query(&[("year_id", year_id)])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let headers = response.headers();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let filename = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);

        let bytes = response.bytes().await?.to_vec();

        Ok(Export {
            filename,
            content_type,
            bytes,
        })
    }
}

/// Filename from an `attachment; filename="..."` header value
fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
