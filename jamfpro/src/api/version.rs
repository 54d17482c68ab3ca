use serde::{Deserialize, Serialize};

use super::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

/// Version API operations
pub struct VersionApi<'a> {
    client: &'a super::Client,
}

impl<'a> VersionApi<'a> {
    pub fn new(client: &'a super::Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/jamf-pro-version
    pub async fn get(&self) -> Result<VersionInfo, ApiError> {
        self.client.get("/api/v1/jamf-pro-version").await
    }
}
