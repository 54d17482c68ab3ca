//! Mobile device configuration profile API implementation

use serde::{Deserialize, Serialize};

use super::common::{encode_path_segment, CreatedResponse, ScopeEntity};
use super::error::ApiError;

/// A Jamf Pro mobile device configuration profile record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "deploymentMethod", skip_serializing_if = "Option::is_none")]
    pub deployment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(rename = "redeployOnUpdate", skip_serializing_if = "Option::is_none")]
    pub redeploy_on_update: Option<String>,
    #[serde(
        rename = "redeployDaysBeforeCertExpires",
        skip_serializing_if = "Option::is_none"
    )]
    pub redeploy_days_before_cert_expires: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payloads: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<ScopeEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ScopeEntity>,
    #[serde(default)]
    pub scope: ProfileScope,
}

/// Scope assignment for a configuration profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileScope {
    #[serde(rename = "allMobileDevices", default)]
    pub all_mobile_devices: bool,
    #[serde(rename = "allJssUsers", default)]
    pub all_jss_users: bool,
    #[serde(rename = "mobileDevices", default)]
    pub mobile_devices: Vec<ScopeEntity>,
    #[serde(rename = "mobileDeviceGroups", default)]
    pub mobile_device_groups: Vec<ScopeEntity>,
    #[serde(rename = "jssUsers", default)]
    pub jss_users: Vec<ScopeEntity>,
    #[serde(rename = "jssUserGroups", default)]
    pub jss_user_groups: Vec<ScopeEntity>,
    #[serde(default)]
    pub buildings: Vec<ScopeEntity>,
    #[serde(default)]
    pub departments: Vec<ScopeEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limitations: Option<ScopeLimitations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<ScopeExclusions>,
}

/// Scope limitations: the profile only applies within these
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeLimitations {
    #[serde(rename = "networkSegments", default)]
    pub network_segments: Vec<ScopeEntity>,
    #[serde(default)]
    pub ibeacons: Vec<ScopeEntity>,
    #[serde(default)]
    pub users: Vec<ScopeEntity>,
    #[serde(rename = "userGroups", default)]
    pub user_groups: Vec<ScopeEntity>,
}

/// Scope exclusions: the profile never applies to these
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeExclusions {
    #[serde(rename = "mobileDevices", default)]
    pub mobile_devices: Vec<ScopeEntity>,
    #[serde(rename = "mobileDeviceGroups", default)]
    pub mobile_device_groups: Vec<ScopeEntity>,
    #[serde(default)]
    pub buildings: Vec<ScopeEntity>,
    #[serde(default)]
    pub departments: Vec<ScopeEntity>,
    #[serde(rename = "jssUsers", default)]
    pub jss_users: Vec<ScopeEntity>,
    #[serde(rename = "jssUserGroups", default)]
    pub jss_user_groups: Vec<ScopeEntity>,
    #[serde(rename = "networkSegments", default)]
    pub network_segments: Vec<ScopeEntity>,
    #[serde(default)]
    pub users: Vec<ScopeEntity>,
    #[serde(rename = "userGroups", default)]
    pub user_groups: Vec<ScopeEntity>,
    #[serde(default)]
    pub ibeacons: Vec<ScopeEntity>,
}

/// Configuration profiles API operations
pub struct ConfigurationProfilesApi<'a> {
    client: &'a super::Client,
}

impl<'a> ConfigurationProfilesApi<'a> {
    pub fn new(client: &'a super::Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/mobile-device-configuration-profiles/{id}
    pub async fn get(&self, id: &str) -> Result<ConfigurationProfile, ApiError> {
        let path = format!(
            "/api/v1/mobile-device-configuration-profiles/{}",
            encode_path_segment(id)
        );
        self.client.get(&path).await
    }

    /// GET /api/v1/mobile-device-configuration-profiles/name/{name}
    pub async fn get_by_name(&self, name: &str) -> Result<ConfigurationProfile, ApiError> {
        let path = format!(
            "/api/v1/mobile-device-configuration-profiles/name/{}",
            encode_path_segment(name)
        );
        self.client.get(&path).await
    }

    /// POST /api/v1/mobile-device-configuration-profiles
    pub async fn create(&self, profile: &ConfigurationProfile) -> Result<CreatedResponse, ApiError> {
        self.client
            .post("/api/v1/mobile-device-configuration-profiles", profile)
            .await
    }

    /// PUT /api/v1/mobile-device-configuration-profiles/{id}
    pub async fn update(&self, id: &str, profile: &ConfigurationProfile) -> Result<(), ApiError> {
        let path = format!(
            "/api/v1/mobile-device-configuration-profiles/{}",
            encode_path_segment(id)
        );
        self.client.put::<(), _>(&path, profile).await
    }

    /// DELETE /api/v1/mobile-device-configuration-profiles/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!(
            "/api/v1/mobile-device-configuration-profiles/{}",
            encode_path_segment(id)
        );
        self.client.delete::<()>(&path).await
    }

    /// DELETE /api/v1/mobile-device-configuration-profiles/name/{name}
    pub async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        let path = format!(
            "/api/v1/mobile-device-configuration-profiles/name/{}",
            encode_path_segment(name)
        );
        self.client.delete::<()>(&path).await
    }
}
