//! Terraform provider for Jamf Pro
//!
//! The provider owns a shared API client and hands it to resources and data
//! sources through the configure step. All CRUD operations run through the
//! orchestration layer in [`crud`], which retries transient API failures and
//! waits out the propagation delay of newly created objects.

pub mod api;
pub mod crud;
pub mod data_sources;
pub mod provider_data;
pub mod resources;

pub use provider_data::JamfProProviderData;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfbridge::context::Context;
use tfbridge::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
};
use tfbridge::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfbridge::types::{AttributePath, Diagnostic};

pub struct JamfProProvider;

impl Default for JamfProProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl JamfProProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for JamfProProvider {
    fn type_name(&self) -> &str {
        "jamfpro"
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ProviderSchemaRequest,
    ) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: SchemaBuilder::new()
                .version(0)
                .description("Interact with a Jamf Pro server")
                .attribute(
                    AttributeBuilder::new("instance_url", AttributeType::String)
                        .description(
                            "Base URL of the Jamf Pro instance. Falls back to the \
                             JAMFPRO_INSTANCE_URL environment variable.",
                        )
                        .optional()
                        .build(),
                )
                .attribute(
                    AttributeBuilder::new("auth_token", AttributeType::String)
                        .description(
                            "Bearer token used to authenticate API requests. Falls back \
                             to the JAMFPRO_AUTH_TOKEN environment variable.",
                        )
                        .optional()
                        .sensitive()
                        .build(),
                )
                .attribute(
                    AttributeBuilder::new("insecure", AttributeType::Bool)
                        .description(
                            "Skip TLS certificate verification. Falls back to the \
                             JAMFPRO_INSECURE environment variable. Defaults to false.",
                        )
                        .optional()
                        .build(),
                )
                .build(),
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let instance_url = request
            .config
            .get_string(&AttributePath::new("instance_url"))
            .ok()
            .or_else(|| std::env::var("JAMFPRO_INSTANCE_URL").ok());

        let auth_token = request
            .config
            .get_string(&AttributePath::new("auth_token"))
            .ok()
            .or_else(|| std::env::var("JAMFPRO_AUTH_TOKEN").ok());

        let insecure = request
            .config
            .get_bool(&AttributePath::new("insecure"))
            .ok()
            .or_else(|| {
                std::env::var("JAMFPRO_INSECURE")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok())
            })
            .unwrap_or(false);

        let mut diagnostics = Vec::new();

        let (instance_url, auth_token) = match (instance_url, auth_token) {
            (Some(url), Some(token)) => (url, token),
            (None, _) => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing instance URL",
                        "instance_url is required (set it in the provider block or via \
                         the JAMFPRO_INSTANCE_URL environment variable)",
                    )
                    .with_attribute(AttributePath::new("instance_url")),
                );
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
            (_, None) => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing auth token",
                        "auth_token is required (set it in the provider block or via \
                         the JAMFPRO_AUTH_TOKEN environment variable)",
                    )
                    .with_attribute(AttributePath::new("auth_token")),
                );
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
        };

        match api::Client::new(&instance_url, &auth_token, insecure) {
            Ok(client) => {
                tracing::info!(instance_url = %instance_url, "configured Jamf Pro provider");
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: Some(Arc::new(JamfProProviderData::new(client))),
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create API client",
                    format!("Could not build the HTTP client: {}", e),
                ));
                ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut registry: HashMap<String, ResourceFactory> = HashMap::new();
        registry.insert(
            "jamfpro_package".to_string(),
            Box::new(|| Box::new(resources::PackageResource::new())),
        );
        registry.insert(
            "jamfpro_webhook".to_string(),
            Box::new(|| Box::new(resources::WebhookResource::new())),
        );
        registry.insert(
            "jamfpro_file_share_distribution_point".to_string(),
            Box::new(|| Box::new(resources::DistributionPointResource::new())),
        );
        registry.insert(
            "jamfpro_mobile_device_configuration_profile".to_string(),
            Box::new(|| Box::new(resources::ConfigurationProfileResource::new())),
        );
        registry.insert(
            "jamfpro_account".to_string(),
            Box::new(|| Box::new(resources::AccountResource::new())),
        );
        registry
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut registry: HashMap<String, DataSourceFactory> = HashMap::new();
        registry.insert(
            "jamfpro_version".to_string(),
            Box::new(|| Box::new(data_sources::VersionDataSource::new())),
        );
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfbridge::resource::{ConfigureResourceRequest, ResourceWithConfigure};
    use tfbridge::types::DynamicValue;

    fn empty_request() -> ConfigureProviderRequest {
        ConfigureProviderRequest {
            terraform_version: "1.9.0".to_string(),
            config: DynamicValue::empty_object(),
        }
    }

    fn clear_env() {
        std::env::remove_var("JAMFPRO_INSTANCE_URL");
        std::env::remove_var("JAMFPRO_AUTH_TOKEN");
        std::env::remove_var("JAMFPRO_INSECURE");
    }

    #[tokio::test]
    #[serial]
    async fn provider_configures_from_env_vars() {
        std::env::set_var("JAMFPRO_INSTANCE_URL", "https://company.jamfcloud.com");
        std::env::set_var("JAMFPRO_AUTH_TOKEN", "token-value");
        std::env::set_var("JAMFPRO_INSECURE", "true");

        let mut provider = JamfProProvider::new();
        let response = provider.configure(Context::new(), empty_request()).await;

        assert!(!tfbridge::types::has_errors(&response.diagnostics));
        assert!(response.provider_data.is_some());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn provider_config_takes_precedence_over_env() {
        std::env::set_var("JAMFPRO_INSTANCE_URL", "https://env.jamfcloud.com");
        std::env::set_var("JAMFPRO_AUTH_TOKEN", "env-token");

        let mut config = DynamicValue::empty_object();
        config
            .set_string(
                &AttributePath::new("instance_url"),
                "https://config.jamfcloud.com".to_string(),
            )
            .unwrap();
        config
            .set_string(&AttributePath::new("auth_token"), "config-token".to_string())
            .unwrap();

        let mut provider = JamfProProvider::new();
        let response = provider
            .configure(
                Context::new(),
                ConfigureProviderRequest {
                    terraform_version: "1.9.0".to_string(),
                    config,
                },
            )
            .await;

        assert!(!tfbridge::types::has_errors(&response.diagnostics));
        assert!(response.provider_data.is_some());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn provider_configure_requires_instance_url() {
        clear_env();
        std::env::set_var("JAMFPRO_AUTH_TOKEN", "token-value");

        let mut provider = JamfProProvider::new();
        let response = provider.configure(Context::new(), empty_request()).await;

        assert!(tfbridge::types::has_errors(&response.diagnostics));
        assert!(response.diagnostics[0].detail.contains("instance_url"));
        assert!(response.provider_data.is_none());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn provider_configure_requires_auth_token() {
        clear_env();
        std::env::set_var("JAMFPRO_INSTANCE_URL", "https://company.jamfcloud.com");

        let mut provider = JamfProProvider::new();
        let response = provider.configure(Context::new(), empty_request()).await;

        assert!(tfbridge::types::has_errors(&response.diagnostics));
        assert!(response.diagnostics[0].detail.contains("auth_token"));
        assert!(response.provider_data.is_none());

        clear_env();
    }

    #[tokio::test]
    async fn provider_registers_all_resource_types() {
        let provider = JamfProProvider::new();
        let registry = provider.resources();

        for type_name in [
            "jamfpro_package",
            "jamfpro_webhook",
            "jamfpro_file_share_distribution_point",
            "jamfpro_mobile_device_configuration_profile",
            "jamfpro_account",
        ] {
            assert!(registry.contains_key(type_name), "missing {}", type_name);
        }

        assert!(provider.data_sources().contains_key("jamfpro_version"));
    }

    #[tokio::test]
    #[serial]
    async fn factory_resources_accept_provider_data() {
        std::env::set_var("JAMFPRO_INSTANCE_URL", "https://company.jamfcloud.com");
        std::env::set_var("JAMFPRO_AUTH_TOKEN", "token-value");

        let mut provider = JamfProProvider::new();
        let response = provider.configure(Context::new(), empty_request()).await;
        let provider_data = response.provider_data;

        let registry = provider.resources();
        let factory = registry.get("jamfpro_package").unwrap();
        let mut resource = factory();

        let configured = resource
            .configure(
                Context::new(),
                ConfigureResourceRequest {
                    provider_data: provider_data.clone(),
                },
            )
            .await;
        assert!(!tfbridge::types::has_errors(&configured.diagnostics));

        clear_env();
    }

    #[tokio::test]
    async fn provider_schema_marks_auth_token_sensitive() {
        let provider = JamfProProvider::new();
        let response = provider.schema(Context::new(), ProviderSchemaRequest).await;

        let token = response
            .schema
            .block
            .attributes
            .iter()
            .find(|a| a.name == "auth_token")
            .expect("auth_token attribute");
        assert!(token.sensitive);
    }
}
