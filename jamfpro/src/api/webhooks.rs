//! Webhook API implementation

use serde::{Deserialize, Serialize};

use super::common::{encode_path_segment, CreatedResponse};
use super::error::ApiError;

/// Events a webhook can subscribe to
pub const WEBHOOK_EVENTS: &[&str] = &[
    "ComputerAdded",
    "ComputerCheckIn",
    "ComputerInventoryCompleted",
    "ComputerPolicyFinished",
    "ComputerPushCapabilityChanged",
    "DeviceAddedToDEP",
    "JSSShutdown",
    "JSSStartup",
    "MobileDeviceCheckIn",
    "MobileDeviceCommandCompleted",
    "MobileDeviceEnrolled",
    "MobileDevicePushSent",
    "MobileDeviceUnEnrolled",
    "PatchSoftwareTitleUpdated",
    "PushSent",
    "RestAPIOperation",
    "SCEPChallenge",
    "SmartGroupComputerMembershipChange",
    "SmartGroupMobileDeviceMembershipChange",
];

/// A Jamf Pro webhook record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub enabled: bool,
    pub url: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub event: String,
    #[serde(rename = "connectionTimeout", skip_serializing_if = "Option::is_none")]
    pub connection_timeout: Option<i64>,
    #[serde(rename = "readTimeout", skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<i64>,
    #[serde(
        rename = "authenticationType",
        skip_serializing_if = "Option::is_none"
    )]
    pub authentication_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Webhooks API for webhook operations
pub struct WebhooksApi<'a> {
    client: &'a super::Client,
}

impl<'a> WebhooksApi<'a> {
    pub fn new(client: &'a super::Client) -> Self {
        Self { client }
    }

    /// GET /api/v1/webhooks/{id}
    pub async fn get(&self, id: &str) -> Result<Webhook, ApiError> {
        let path = format!("/api/v1/webhooks/{}", encode_path_segment(id));
        self.client.get(&path).await
    }

    /// GET /api/v1/webhooks/name/{name}
    pub async fn get_by_name(&self, name: &str) -> Result<Webhook, ApiError> {
        let path = format!("/api/v1/webhooks/name/{}", encode_path_segment(name));
        self.client.get(&path).await
    }

    /// POST /api/v1/webhooks
    pub async fn create(&self, webhook: &Webhook) -> Result<CreatedResponse, ApiError> {
        self.client.post("/api/v1/webhooks", webhook).await
    }

    /// PUT /api/v1/webhooks/{id}
    pub async fn update(&self, id: &str, webhook: &Webhook) -> Result<(), ApiError> {
        let path = format!("/api/v1/webhooks/{}", encode_path_segment(id));
        self.client.put::<(), _>(&path, webhook).await
    }

    /// DELETE /api/v1/webhooks/{id}
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/webhooks/{}", encode_path_segment(id));
        self.client.delete::<()>(&path).await
    }

    /// DELETE /api/v1/webhooks/name/{name}
    pub async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        let path = format!("/api/v1/webhooks/name/{}", encode_path_segment(name));
        self.client.delete::<()>(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn webhook_round_trips_through_client() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/webhooks/3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"3","name":"enrollment-hook","enabled":true,"url":"https://hooks.example.com/jamf","contentType":"application/json","event":"ComputerAdded","connectionTimeout":5,"readTimeout":2}"#,
            )
            .create_async()
            .await;

        let client = super::super::Client::new(&server.url(), "token", false).unwrap();
        let webhook = client.webhooks().get("3").await.unwrap();

        assert_eq!(webhook.name, "enrollment-hook");
        assert!(webhook.enabled);
        assert_eq!(webhook.event, "ComputerAdded");
        assert_eq!(webhook.connection_timeout, Some(5));
        mock.assert_async().await;
    }

    #[test]
    fn event_catalog_contains_common_events() {
        assert!(WEBHOOK_EVENTS.contains(&"ComputerAdded"));
        assert!(WEBHOOK_EVENTS.contains(&"MobileDeviceEnrolled"));
        assert!(!WEBHOOK_EVENTS.contains(&"NotARealEvent"));
    }
}
