//! Webhook resource implementation

use std::sync::Arc;

use async_trait::async_trait;
use tfbridge::context::Context;
use tfbridge::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfbridge::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfbridge::types::{AttributePath, Diagnostic, DynamicValue};

use crate::api::webhooks::{Webhook, WEBHOOK_EVENTS};
use crate::api::{ApiError, Client};
use crate::crud::state::StateWriter;
use crate::crud::{self, ResourceApi, Timeouts};

#[derive(Default)]
pub struct WebhookResource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl WebhookResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn handler(&self) -> Result<WebhookHandler, Diagnostic> {
        match &self.provider_data {
            Some(data) => Ok(WebhookHandler {
                client: data.client.clone(),
            }),
            None => Err(Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )),
        }
    }
}

struct WebhookHandler {
    client: Arc<Client>,
}

#[async_trait]
impl ResourceApi for WebhookHandler {
    type Payload = Webhook;
    type Entity = Webhook;

    fn display_name(&self) -> &'static str {
        "Jamf Pro Webhook"
    }

    fn construct(&self, config: &DynamicValue) -> Result<Webhook, Diagnostic> {
        let name = config
            .get_string(&AttributePath::new("name"))
            .map_err(|_| Diagnostic::error("Missing name", "The 'name' attribute is required"))?;
        let enabled = config
            .get_bool(&AttributePath::new("enabled"))
            .map_err(|_| {
                Diagnostic::error("Missing enabled", "The 'enabled' attribute is required")
            })?;
        let url = config
            .get_string(&AttributePath::new("url"))
            .map_err(|_| Diagnostic::error("Missing url", "The 'url' attribute is required"))?;
        let content_type = config
            .get_string(&AttributePath::new("content_type"))
            .map_err(|_| {
                Diagnostic::error(
                    "Missing content_type",
                    "The 'content_type' attribute is required",
                )
            })?;
        let event = config
            .get_string(&AttributePath::new("event"))
            .map_err(|_| Diagnostic::error("Missing event", "The 'event' attribute is required"))?;

        Ok(Webhook {
            id: None,
            name,
            enabled,
            url,
            content_type,
            event,
            connection_timeout: config
                .get_i64(&AttributePath::new("connection_timeout"))
                .ok(),
            read_timeout: config.get_i64(&AttributePath::new("read_timeout")).ok(),
            authentication_type: config
                .get_string(&AttributePath::new("authentication_type"))
                .ok(),
            username: config.get_string(&AttributePath::new("username")).ok(),
            password: config.get_string(&AttributePath::new("password")).ok(),
        })
    }

    async fn create(&self, payload: &Webhook) -> Result<String, ApiError> {
        let created = self.client.webhooks().create(payload).await?;
        Ok(created.id)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Webhook, ApiError> {
        self.client.webhooks().get(id).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Webhook, ApiError> {
        self.client.webhooks().get_by_name(name).await
    }

    async fn update_by_id(&self, id: &str, payload: &Webhook) -> Result<(), ApiError> {
        self.client.webhooks().update(id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.client.webhooks().delete(id).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        self.client.webhooks().delete_by_name(name).await
    }

    fn reconcile(&self, entity: &Webhook, state: &mut DynamicValue) -> Vec<Diagnostic> {
        let mut writer = StateWriter::new(state);
        writer
            .string("name", &entity.name)
            .bool("enabled", entity.enabled)
            .string("url", &entity.url)
            .string("content_type", &entity.content_type)
            .string("event", &entity.event)
            .optional_i64("connection_timeout", entity.connection_timeout)
            .optional_i64("read_timeout", entity.read_timeout)
            .optional_string("authentication_type", entity.authentication_type.as_deref())
            .optional_string("username", entity.username.as_deref());
        // The API never echoes the password back; keep whatever is in state
        writer.finish()
    }
}

#[async_trait]
impl Resource for WebhookResource {
    fn type_name(&self) -> &str {
        "jamfpro_webhook"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages webhooks in Jamf Pro")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The unique identifier of the webhook")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The unique name of the webhook")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("enabled", AttributeType::Bool)
                    .description("Whether the webhook is enabled")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("url", AttributeType::String)
                    .description("The URL the webhook posts to")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("content_type", AttributeType::String)
                    .description("The content type of the webhook payload (text/xml or application/json)")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("event", AttributeType::String)
                    .description("The Jamf Pro event that triggers the webhook")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("connection_timeout", AttributeType::Number)
                    .description("Connection timeout in seconds")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("read_timeout", AttributeType::Number)
                    .description("Read timeout in seconds")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("authentication_type", AttributeType::String)
                    .description("Authentication type for the webhook endpoint")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("username", AttributeType::String)
                    .description("Username for basic authentication")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("password", AttributeType::String)
                    .description("Password for basic authentication")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .build();

        ResourceSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = vec![];

        if let Ok(url) = request.config.get_string(&AttributePath::new("url")) {
            if url::Url::parse(&url).is_err() {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid URL",
                        format!("'{}' is not a valid URL", url),
                    )
                    .with_attribute(AttributePath::new("url")),
                );
            }
        }

        if let Ok(event) = request.config.get_string(&AttributePath::new("event")) {
            if !WEBHOOK_EVENTS.contains(&event.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid event",
                        format!(
                            "'{}' is not a recognized webhook event. Valid events: {}",
                            event,
                            WEBHOOK_EVENTS.join(", ")
                        ),
                    )
                    .with_attribute(AttributePath::new("event")),
                );
            }
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let handler = match self.handler() {
            Ok(handler) => handler,
            Err(diag) => {
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    diagnostics: vec![diag],
                }
            }
        };
        crud::create(&ctx, &handler, &Timeouts::default(), request).await
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let handler = match self.handler() {
            Ok(handler) => handler,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };
        crud::read(&ctx, &handler, &Timeouts::default(), request).await
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let handler = match self.handler() {
            Ok(handler) => handler,
            Err(diag) => {
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics: vec![diag],
                }
            }
        };
        crud::update(&ctx, &handler, &Timeouts::default(), request).await
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let handler = match self.handler() {
            Ok(handler) => handler,
            Err(diag) => {
                return DeleteResourceResponse {
                    diagnostics: vec![diag],
                }
            }
        };
        crud::delete(&ctx, &handler, &Timeouts::default(), request).await
    }
}

#[async_trait]
impl ResourceWithConfigure for WebhookResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];

        if let Some(data) = request.provider_data {
            if let Some(provider_data) = data.downcast_ref::<crate::JamfProProviderData>() {
                self.provider_data = Some(provider_data.clone());
            } else {
                diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract JamfProProviderData from provider data",
                ));
            }
        } else {
            diagnostics.push(Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            ));
        }

        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for WebhookResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        tfbridge::import_state_passthrough_id(
            &ctx,
            AttributePath::new("id"),
            &request,
            &mut response,
        );
        response
    }
}
