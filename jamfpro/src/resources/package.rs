//! Package resource implementation

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

use crate::api::packages::Package;
use crate::api::{ApiError, Client};
use crate::crud::state::StateWriter;
use crate::crud::{self, ResourceApi, Timeouts};

#[derive(Default)]
pub struct PackageResource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl PackageResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn handler(&self) -> Result<PackageHandler, Diagnostic> {
        match &self.provider_data {
            Some(data) => Ok(PackageHandler {
                client: data.client.clone(),
            }),
            None => Err(Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )),
        }
    }
}

/// Typed endpoint surface handed to the CRUD orchestrator
struct PackageHandler {
    client: Arc<Client>,
}

#[async_trait]
impl ResourceApi for PackageHandler {
    type Payload = Package;
    type Entity = Package;

    fn display_name(&self) -> &'static str {
        "Jamf Pro Package"
    }

    fn construct(&self, config: &DynamicValue) -> Result<Package, Diagnostic> {
        let name = config
            .get_string(&AttributePath::new("name"))
            .map_err(|_| Diagnostic::error("Missing name", "The 'name' attribute is required"))?;
        let category = config
            .get_string(&AttributePath::new("category"))
            .map_err(|_| {
                Diagnostic::error("Missing category", "The 'category' attribute is required")
            })?;

        Ok(Package {
            id: None,
            name,
            category,
            filename: config.get_string(&AttributePath::new("filename")).ok(),
            info: config.get_string(&AttributePath::new("info")).ok(),
            notes: config.get_string(&AttributePath::new("notes")).ok(),
            priority: config.get_i64(&AttributePath::new("priority")).ok(),
            reboot_required: config
                .get_bool(&AttributePath::new("reboot_required"))
                .ok(),
            fill_user_template: config
                .get_bool(&AttributePath::new("fill_user_template"))
                .ok(),
            fill_existing_users: config
                .get_bool(&AttributePath::new("fill_existing_users"))
                .ok(),
            os_requirements: config
                .get_string(&AttributePath::new("os_requirements"))
                .ok(),
        })
    }

    async fn create(&self, payload: &Package) -> Result<String, ApiError> {
        let created = self.client.packages().create(payload).await?;
        Ok(created.id)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Package, ApiError> {
        self.client.packages().get(id).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Package, ApiError> {
        self.client.packages().get_by_name(name).await
    }

    async fn update_by_id(&self, id: &str, payload: &Package) -> Result<(), ApiError> {
        self.client.packages().update(id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.client.packages().delete(id).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        self.client.packages().delete_by_name(name).await
    }

    fn reconcile(&self, entity: &Package, state: &mut DynamicValue) -> Vec<Diagnostic> {
        let mut writer = StateWriter::new(state);
        writer
            .string("name", &entity.name)
            .string("category", &entity.category)
            .optional_string("filename", entity.filename.as_deref())
            .optional_string("info", entity.info.as_deref())
            .optional_string("notes", entity.notes.as_deref())
            .optional_i64("priority", entity.priority)
            .optional_bool("reboot_required", entity.reboot_required)
            .optional_bool("fill_user_template", entity.fill_user_template)
            .optional_bool("fill_existing_users", entity.fill_existing_users)
            .optional_string("os_requirements", entity.os_requirements.as_deref());
        writer.finish()
    }
}

#[async_trait]
impl Resource for PackageResource {
    fn type_name(&self) -> &str {
        "jamfpro_package"
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
            .description("Manages software packages in Jamf Pro")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The unique identifier of the package")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The unique name of the package")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("category", AttributeType::String)
                    .description("The category of the package, or 'Unknown' for none")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("filename", AttributeType::String)
                    .description("The filename of the package")
                    .optional()
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("info", AttributeType::String)
                    .description("Information about the package")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("notes", AttributeType::String)
                    .description("Notes associated with the package")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("priority", AttributeType::Number)
                    .description("The deployment priority of the package")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("reboot_required", AttributeType::Bool)
                    .description("Whether a reboot is required after installing the package")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("fill_user_template", AttributeType::Bool)
                    .description("Whether to fill the user template")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("fill_existing_users", AttributeType::Bool)
                    .description("Whether to fill existing user home directories")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("os_requirements", AttributeType::String)
                    .description("The OS requirements for the package")
                    .optional()
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

        if let Ok(category) = request.config.get_string(&AttributePath::new("category")) {
            if category.is_empty() {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid category",
                        "Category must not be empty. Set 'Unknown' to apply no category \
                         or supply a valid category name",
                    )
                    .with_attribute(AttributePath::new("category")),
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
impl ResourceWithConfigure for PackageResource {
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
impl ResourceWithImportState for PackageResource {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_category(category: &str) -> DynamicValue {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("name"), "Firefox.pkg".to_string())
            .unwrap();
        config
            .set_string(&AttributePath::new("category"), category.to_string())
            .unwrap();
        config
    }

    #[tokio::test]
    async fn validate_rejects_empty_category() {
        let resource = PackageResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_package".to_string(),
                    config: config_with_category(""),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn validate_accepts_unknown_category() {
        let resource = PackageResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_package".to_string(),
                    config: config_with_category("Unknown"),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn create_without_provider_data_fails_cleanly() {
        let resource = PackageResource::new();
        let response = resource
            .create(
                Context::new(),
                CreateResourceRequest {
                    type_name: "jamfpro_package".to_string(),
                    planned_state: DynamicValue::empty_object(),
                    config: config_with_category("Browsers"),
                },
            )
            .await;

        assert!(tfbridge::types::has_errors(&response.diagnostics));
    }

    #[test]
    fn construct_maps_config_to_payload() {
        let handler_config = {
            let mut config = config_with_category("Browsers");
            config
                .set_number(&AttributePath::new("priority"), 10.0)
                .unwrap();
            config
                .set_bool(&AttributePath::new("reboot_required"), true)
                .unwrap();
            config
        };

        // construct is pure over the config, no client needed
        let handler = PackageHandler {
            client: Arc::new(Client::new("https://example.jamfcloud.com", "t", false).unwrap()),
        };
        let payload = handler.construct(&handler_config).unwrap();

        assert_eq!(payload.name, "Firefox.pkg");
        assert_eq!(payload.category, "Browsers");
        assert_eq!(payload.priority, Some(10));
        assert_eq!(payload.reboot_required, Some(true));
        assert!(payload.info.is_none());
    }
}
