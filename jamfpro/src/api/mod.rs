//! Jamf Pro HTTP API client and typed endpoint modules

pub mod accounts;
pub mod client;
pub mod common;
pub mod configuration_profiles;
pub mod distribution_points;
pub mod error;
pub mod packages;
pub mod pool;
pub mod version;
pub mod webhooks;

pub use client::Client;
pub use common::{ApiErrorDetails, ApiErrorResponse, CreatedResponse, ScopeEntity};
pub use error::ApiError;
pub use pool::{ConnectionPoolConfig, ConnectionPoolManager};

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn client_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/jamf-pro-version")
            .match_header("authorization", "Bearer secret-token")
            .with_body(r#"{"version":"11.5.1"}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "secret-token", false).unwrap();
        let version = client.version().get().await.unwrap();

        assert_eq!(version.version, "11.5.1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_strips_trailing_slash_from_instance_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/jamf-pro-version")
            .with_body(r#"{"version":"11.5.1"}"#)
            .create_async()
            .await;

        let client = Client::new(&format!("{}/", server.url()), "token", false).unwrap();
        let _ = client.version().get().await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_classifies_auth_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/jamf-pro-version")
            .with_status(401)
            .with_body(r#"{"httpStatus":401,"errors":[]}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "expired", false).unwrap();
        let result = client.version().get().await;

        assert!(matches!(result, Err(ApiError::AuthError)));
    }

    #[tokio::test]
    async fn client_classifies_server_error_as_transient() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/jamf-pro-version")
            .with_status(502)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", false).unwrap();
        let err = client.version().get().await.unwrap_err();

        assert!(matches!(err, ApiError::ServiceUnavailable));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn client_classifies_rate_limiting_as_transient() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/jamf-pro-version")
            .with_status(429)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", false).unwrap();
        let err = client.version().get().await.unwrap_err();

        assert!(matches!(err, ApiError::RateLimited));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn client_parses_error_detail_on_bad_request() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/packages")
            .with_status(400)
            .with_body(
                r#"{"httpStatus":400,"errors":[{"code":"INVALID_FIELD","description":"category is required","field":"category"}]}"#,
            )
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", false).unwrap();
        let package = packages::Package {
            name: "broken.pkg".to_string(),
            ..Default::default()
        };
        let err = client.packages().create(&package).await.unwrap_err();

        match err {
            ApiError::ApiError {
                status, details, ..
            } => {
                assert_eq!(status, 400);
                let details = details.unwrap();
                assert_eq!(details.causes[0].field.as_deref(), Some("category"));
            }
            other => panic!("expected ApiError::ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn client_records_pool_statistics() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("GET", "/api/v1/jamf-pro-version")
            .with_body(r#"{"version":"11.5.1"}"#)
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/api/v1/packages/1")
            .with_status(404)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "token", false).unwrap();
        let _ = client.version().get().await;
        let _ = client.packages().get("1").await;

        let stats = client.get_connection_stats().await;
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.failed_requests, 1);
    }
}
