//! Package API implementation

use serde::{Deserialize, Serialize};

use super::common::{encode_path_segment, CreatedResponse};
use super::error::ApiError;

/// A Jamf Pro package record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Package {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(rename = "rebootRequired", skip_serializing_if = "Option::is_none")]
    pub reboot_required: Option<bool>,
    #[serde(rename = "fillUserTemplate", skip_serializing_if = "Option::is_none")]
    pub fill_user_template: Option<bool>,
    #[serde(rename = "fillExistingUsers", skip_serializing_if = "Option::is_none")]
    pub fill_existing_users: Option<bool>,
    #[serde(rename = "osRequirements", skip_serializing_if = "Option::is_none")]
    pub os_requirements: Option<String>,
}

/// Packages API for package operations
pub struct PackagesApi<'a> {
    client: &'a super::Client,
}

impl<'a> PackagesApi<'a> {
    pub fn new(client: &'a super::Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/packages/{id}
    pub async fn get(&self, id: &str) -> Result<Package, ApiError> {
        let path = format!("/api/v1/packages/{}", encode_path_segment(id));
        self.client.get(&path).await
    }

    /// GET /api/v1/packages/name/{name}
    pub async fn get_by_name(&self, name: &str) -> Result<Package, ApiError> {
        let path = format!("/api/v1/packages/name/{}", encode_path_segment(name));
        self.client.get(&path).await
    }

    /// POST /api/v1/packages
    pub async fn create(&self, package: &Package) -> Result<CreatedResponse, ApiError> {
        self.client.post("/api/v1/packages", package).await
    }

    /// PUT /api/v1/packages/{id}
    pub async fn update(&self, id: &str, package: &Package) -> Result<(), ApiError> {
        let path = format!("/api/v1/packages/{}", encode_path_segment(id));
        self.client.put::<(), _>(&path, package).await
    }

    /// DELETE /api/v1/packages/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/packages/{}", encode_path_segment(id));
        self.client.delete::<()>(&path).await
    }

    /// DELETE /api/v1/packages/name/{name}
    pub async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/packages/name/{}", encode_path_segment(name));
        self.client.delete::<()>(&path).await
    }
}
