use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::common::{ApiErrorDetails, ApiErrorResponse};
use super::error::ApiError;
use super::pool::{ConnectionPoolConfig, ConnectionPoolManager};

/// Jamf Pro API client
///
/// Each request is a single attempt. Retry and availability polling live
/// in the CRUD layer so deadlines can span the whole operation.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    pool_manager: ConnectionPoolManager,
}

impl Client {
    /// Create a new API client with default pool configuration
    pub fn new(instance_url: &str, auth_token: &str, insecure: bool) -> Result<Self, ApiError> {
        Self::with_config(instance_url, auth_token, insecure, ConnectionPoolConfig::default())
    }

    /// Create a new API client with a custom pool configuration
    pub fn with_config(
        instance_url: &str,
        auth_token: &str,
        insecure: bool,
        pool_config: ConnectionPoolConfig,
    ) -> Result<Self, ApiError> {
        let pool_manager = ConnectionPoolManager::new(pool_config);
        let http_client = pool_manager.build_client(insecure)?;

        let base_url = instance_url.trim_end_matches('/').to_string();
        let auth_header = format!("Bearer {}", auth_token);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                auth_header,
                pool_manager,
            }),
        })
    }

    /// Execute a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);

        tracing::debug!("GET request to: {}", url);

        let result = self
            .inner
            .http_client
            .get(&url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await;

        self.dispatch(result, path).await
    }

    /// Execute a POST request
    pub async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);

        tracing::debug!("POST request to: {}", url);

        let result = self
            .inner
            .http_client
            .post(&url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await;

        self.dispatch(result, path).await
    }

    /// Execute a PUT request
    pub async fn put<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);

        tracing::debug!("PUT request to: {}", url);

        let result = self
            .inner
            .http_client
            .put(&url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await;

        self.dispatch(result, path).await
    }

    /// Execute a DELETE request
    pub async fn delete<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);

        tracing::debug!("DELETE request to: {}", url);

        let result = self
            .inner
            .http_client
            .delete(&url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await;

        self.dispatch(result, path).await
    }

    /// Get connection pool statistics
    pub async fn get_connection_stats(&self) -> super::pool::ConnectionStats {
        self.inner.pool_manager.get_stats().await
    }

    /// Packages API operations
    pub fn packages(&self) -> crate::api::packages::PackagesApi<'_> {
        crate::api::packages::PackagesApi::new(self)
    }

    /// Webhooks API operations
    pub fn webhooks(&self) -> crate::api::webhooks::WebhooksApi<'_> {
        crate::api::webhooks::WebhooksApi::new(self)
    }

    /// File share distribution points API operations
    pub fn distribution_points(&self) -> crate::api::distribution_points::DistributionPointsApi<'_> {
        crate::api::distribution_points::DistributionPointsApi::new(self)
    }

    /// Mobile device configuration profiles API operations
    pub fn configuration_profiles(
        &self,
    ) -> crate::api::configuration_profiles::ConfigurationProfilesApi<'_> {
        crate::api::configuration_profiles::ConfigurationProfilesApi::new(self)
    }

    /// Accounts API operations
    pub fn accounts(&self) -> crate::api::accounts::AccountsApi<'_> {
        crate::api::accounts::AccountsApi::new(self)
    }

    /// Version API operations
    pub fn version(&self) -> crate::api::version::VersionApi<'_> {
        crate::api::version::VersionApi::new(self)
    }

    /// Classify the transport outcome into an API result
    async fn dispatch<T: for<'de> Deserialize<'de>>(
        &self,
        result: Result<reqwest::Response, reqwest::Error>,
        path: &str,
    ) -> Result<T, ApiError> {
        match result {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    self.inner.pool_manager.record_request(true).await;
                    return self.parse_success_response(response).await;
                }

                self.inner.pool_manager.record_request(false).await;

                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(ApiError::AuthError);
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ApiError::NotFound {
                        path: path.to_string(),
                    });
                }

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(ApiError::RateLimited);
                }

                if status.is_server_error() {
                    return Err(ApiError::ServiceUnavailable);
                }

                self.handle_error_response(response).await
            }
            Err(e) => {
                self.inner.pool_manager.record_request(false).await;

                if e.is_timeout() {
                    Err(ApiError::Timeout(
                        self.inner.pool_manager.request_timeout().as_secs(),
                    ))
                } else if e.is_connect() {
                    Err(ApiError::ServiceUnavailable)
                } else {
                    Err(ApiError::RequestError(e))
                }
            }
        }
    }

    /// Parse successful response
    async fn parse_success_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        // DELETE and some PUT endpoints reply with an empty body.
        let effective = if text.trim().is_empty() { "null" } else { &text };

        match serde_json::from_str::<T>(effective) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
                Err(ApiError::ParseError(format!(
                    "Failed to parse response: {}",
                    e
                )))
            }
        }
    }

    /// Handle error response
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let details = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(err_resp) => Some(Box::new(ApiErrorDetails {
                causes: err_resp.errors,
            })),
            Err(_) => None,
        };

        Err(ApiError::ApiError {
            status,
            message: text,
            details,
        })
    }
}
