//! Account API implementation

use serde::{Deserialize, Serialize};

use super::common::{encode_path_segment, CreatedResponse};
use super::error::ApiError;

/// Access levels an account can hold
pub const ACCESS_LEVELS: &[&str] = &["Full Access", "Site Access", "Group Access"];

/// Privilege sets an account can hold
pub const PRIVILEGE_SETS: &[&str] = &["Administrator", "Auditor", "Enrollment Only", "Custom"];

/// A Jamf Pro account record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub enabled: String,
    #[serde(rename = "accessLevel")]
    pub access_level: String,
    #[serde(rename = "privilegeSet")]
    pub privilege_set: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "jssObjectsPrivileges", default)]
    pub jss_objects_privileges: Vec<String>,
    #[serde(rename = "jssSettingsPrivileges", default)]
    pub jss_settings_privileges: Vec<String>,
    #[serde(rename = "jssActionsPrivileges", default)]
    pub jss_actions_privileges: Vec<String>,
}

/// Accounts API for account operations
pub struct AccountsApi<'a> {
    client: &'a super::Client,
}

impl<'a> AccountsApi<'a> {
    pub fn new(client: &'a super::Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/accounts/{id}
    pub async fn get(&self, id: &str) -> Result<Account, ApiError> {
        let path = format!("/api/v1/accounts/{}", encode_path_segment(id));
        self.client.get(&path).await
    }

    /// GET /api/v1/accounts/name/{name}
    pub async fn get_by_name(&self, name: &str) -> Result<Account, ApiError> {
        let path = format!("/api/v1/accounts/name/{}", encode_path_segment(name));
        self.client.get(&path).await
    }

    /// POST /api/v1/accounts
    pub async fn create(&self, account: &Account) -> Result<CreatedResponse, ApiError> {
        self.client.post("/api/v1/accounts", account).await
    }

    /// PUT /api/v1/accounts/{id}
    pub async fn update(&self, id: &str, account: &Account) -> Result<(), ApiError> {
        let path = format!("/api/v1/accounts/{}", encode_path_segment(id));
        self.client.put::<(), _>(&path, account).await
    }

    /// DELETE /api/v1/accounts/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/accounts/{}", encode_path_segment(id));
        self.client.delete::<()>(&path).await
    }

    /// DELETE /api/v1/accounts/name/{name}
    pub async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/accounts/name/{}", encode_path_segment(name));
        self.client.delete::<()>(&path).await
    }
}
