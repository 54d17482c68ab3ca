//! File share distribution point API implementation

use serde::{Deserialize, Serialize};

use super::common::{encode_path_segment, CreatedResponse};
use super::error::ApiError;

/// A Jamf Pro file share distribution point record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    #[serde(rename = "isMaster", skip_serializing_if = "Option::is_none")]
    pub is_master: Option<bool>,
    #[serde(rename = "failoverPoint", skip_serializing_if = "Option::is_none")]
    pub failover_point: Option<String>,
    #[serde(rename = "connectionType")]
    pub connection_type: String,
    #[serde(rename = "shareName")]
    pub share_name: String,
    #[serde(rename = "sharePort", skip_serializing_if = "Option::is_none")]
    pub share_port: Option<i64>,
    #[serde(
        rename = "enableLoadBalancing",
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_load_balancing: Option<bool>,
    #[serde(rename = "workgroupOrDomain", skip_serializing_if = "Option::is_none")]
    pub workgroup_or_domain: Option<String>,
    #[serde(rename = "readOnlyUsername", skip_serializing_if = "Option::is_none")]
    pub read_only_username: Option<String>,
    #[serde(rename = "readOnlyPassword", skip_serializing_if = "Option::is_none")]
    pub read_only_password: Option<String>,
    #[serde(rename = "readWriteUsername", skip_serializing_if = "Option::is_none")]
    pub read_write_username: Option<String>,
    #[serde(rename = "readWritePassword", skip_serializing_if = "Option::is_none")]
    pub read_write_password: Option<String>,
    #[serde(
        rename = "httpsDownloadsEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub https_downloads_enabled: Option<bool>,
    #[serde(rename = "httpUrl", skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,
    #[serde(rename = "httpsSharePath", skip_serializing_if = "Option::is_none")]
    pub https_share_path: Option<String>,
    #[serde(rename = "httpsPort", skip_serializing_if = "Option::is_none")]
    pub https_port: Option<i64>,
    #[serde(
        rename = "httpsUsernamePasswordRequired",
        skip_serializing_if = "Option::is_none"
    )]
    pub https_username_password_required: Option<bool>,
    #[serde(rename = "httpsUsername", skip_serializing_if = "Option::is_none")]
    pub https_username: Option<String>,
    #[serde(rename = "httpsPassword", skip_serializing_if = "Option::is_none")]
    pub https_password: Option<String>,
}

/// Distribution points API for file share operations
pub struct DistributionPointsApi<'a> {
    client: &'a super::Client,
}

impl<'a> DistributionPointsApi<'a> {
    pub fn new(client: &'a super::Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/distribution-points/{id}
    pub async fn get(&self, id: &str) -> Result<DistributionPoint, ApiError> {
        let path = format!("/api/v1/distribution-points/{}", encode_path_segment(id));
        self.client.get(&path).await
    }

    /// GET /api/v1/distribution-points/name/{name}
    pub async fn get_by_name(&self, name: &str) -> Result<DistributionPoint, ApiError> {
        let path = format!(
            "/api/v1/distribution-points/name/{}",
            encode_path_segment(name)
        );
        self.client.get(&path).await
    }

    /// POST /api/v1/distribution-points
    pub async fn create(&self, point: &DistributionPoint) -> Result<CreatedResponse, ApiError> {
        self.client.post("/api/v1/distribution-points", point).await
    }

    /// PUT /api/v1/distribution-points/{id}
    pub async fn update(&self, id: &str, point: &DistributionPoint) -> Result<(), ApiError> {
        let path = format!("/api/v1/distribution-points/{}", encode_path_segment(id));
        self.client.put::<(), _>(&path, point).await
    }

    /// DELETE /api/v1/distribution-points/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/distribution-points/{}", encode_path_segment(id));
        self.client.delete::<()>(&path).await
    }

    /// DELETE /api/v1/distribution-points/name/{name}
    pub async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        let path = format!(
            "/api/v1/distribution-points/name/{}",
            encode_path_segment(name)
        );
        self.client.delete::<()>(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn distribution_point_deserializes_share_settings() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/distribution-points/5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"5","name":"HQ File Share","ipAddress":"fileshare.example.com","connectionType":"SMB","shareName":"jamf","sharePort":445,"workgroupOrDomain":"CORP","isMaster":true}"#,
            )
            .create_async()
            .await;

        let client = super::super::Client::new(&server.url(), "token", false).unwrap();
        let point = client.distribution_points().get("5").await.unwrap();

        assert_eq!(point.name, "HQ File Share");
        assert_eq!(point.connection_type, "SMB");
        assert_eq!(point.share_port, Some(445));
        assert_eq!(point.is_master, Some(true));
        mock.assert_async().await;
    }
}
