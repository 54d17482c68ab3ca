//! File share distribution point resource implementation

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

use crate::api::distribution_points::DistributionPoint;
use crate::api::{ApiError, Client};
use crate::crud::state::StateWriter;
use crate::crud::{self, ResourceApi, Timeouts};

const CONNECTION_TYPES: &[&str] = &["SMB", "AFP"];

#[derive(Default)]
pub struct DistributionPointResource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl DistributionPointResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn handler(&self) -> Result<DistributionPointHandler, Diagnostic> {
        match &self.provider_data {
            Some(data) => Ok(DistributionPointHandler {
                client: data.client.clone(),
            }),
            None => Err(Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )),
        }
    }
}

struct DistributionPointHandler {
    client: Arc<Client>,
}

#[async_trait]
impl ResourceApi for DistributionPointHandler {
    type Payload = DistributionPoint;
    type Entity = DistributionPoint;

    fn display_name(&self) -> &'static str {
        "Jamf Pro File Share Distribution Point"
    }

    fn construct(&self, config: &DynamicValue) -> Result<DistributionPoint, Diagnostic> {
        let name = config
            .get_string(&AttributePath::new("name"))
            .map_err(|_| Diagnostic::error("Missing name", "The 'name' attribute is required"))?;
        let ip_address = config
            .get_string(&AttributePath::new("ip_address"))
            .map_err(|_| {
                Diagnostic::error("Missing ip_address", "The 'ip_address' attribute is required")
            })?;
        let connection_type = config
            .get_string(&AttributePath::new("connection_type"))
            .map_err(|_| {
                Diagnostic::error(
                    "Missing connection_type",
                    "The 'connection_type' attribute is required",
                )
            })?;
        let share_name = config
            .get_string(&AttributePath::new("share_name"))
            .map_err(|_| {
                Diagnostic::error("Missing share_name", "The 'share_name' attribute is required")
            })?;

        Ok(DistributionPoint {
            id: None,
            name,
            ip_address,
            is_master: config.get_bool(&AttributePath::new("is_master")).ok(),
            failover_point: config
                .get_string(&AttributePath::new("failover_point"))
                .ok(),
            connection_type,
            share_name,
            share_port: config.get_i64(&AttributePath::new("share_port")).ok(),
            enable_load_balancing: config
                .get_bool(&AttributePath::new("enable_load_balancing"))
                .ok(),
            workgroup_or_domain: config
                .get_string(&AttributePath::new("workgroup_or_domain"))
                .ok(),
            read_only_username: config
                .get_string(&AttributePath::new("read_only_username"))
                .ok(),
            read_only_password: config
                .get_string(&AttributePath::new("read_only_password"))
                .ok(),
            read_write_username: config
                .get_string(&AttributePath::new("read_write_username"))
                .ok(),
            read_write_password: config
                .get_string(&AttributePath::new("read_write_password"))
                .ok(),
            https_downloads_enabled: config
                .get_bool(&AttributePath::new("https_downloads_enabled"))
                .ok(),
            http_url: config.get_string(&AttributePath::new("http_url")).ok(),
            https_share_path: config
                .get_string(&AttributePath::new("https_share_path"))
                .ok(),
            https_port: config.get_i64(&AttributePath::new("https_port")).ok(),
            https_username_password_required: config
                .get_bool(&AttributePath::new("https_username_password_required"))
                .ok(),
            https_username: config
                .get_string(&AttributePath::new("https_username"))
                .ok(),
            https_password: config
                .get_string(&AttributePath::new("https_password"))
                .ok(),
        })
    }

    async fn create(&self, payload: &DistributionPoint) -> Result<String, ApiError> {
        let created = self.client.distribution_points().create(payload).await?;
        Ok(created.id)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<DistributionPoint, ApiError> {
        self.client.distribution_points().get(id).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<DistributionPoint, ApiError> {
        self.client.distribution_points().get_by_name(name).await
    }

    async fn update_by_id(&self, id: &str, payload: &DistributionPoint) -> Result<(), ApiError> {
        self.client.distribution_points().update(id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.client.distribution_points().delete(id).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        self.client.distribution_points().delete_by_name(name).await
    }

    fn reconcile(&self, entity: &DistributionPoint, state: &mut DynamicValue) -> Vec<Diagnostic> {
        let mut writer = StateWriter::new(state);
        writer
            .string("name", &entity.name)
            .string("ip_address", &entity.ip_address)
            .string("connection_type", &entity.connection_type)
            .string("share_name", &entity.share_name)
            .optional_bool("is_master", entity.is_master)
            .optional_string("failover_point", entity.failover_point.as_deref())
            .optional_i64("share_port", entity.share_port)
            .optional_bool("enable_load_balancing", entity.enable_load_balancing)
            .optional_string("workgroup_or_domain", entity.workgroup_or_domain.as_deref())
            .optional_string("read_only_username", entity.read_only_username.as_deref())
            .optional_string("read_write_username", entity.read_write_username.as_deref())
            .optional_bool("https_downloads_enabled", entity.https_downloads_enabled)
            .optional_string("http_url", entity.http_url.as_deref())
            .optional_string("https_share_path", entity.https_share_path.as_deref())
            .optional_i64("https_port", entity.https_port)
            .optional_bool(
                "https_username_password_required",
                entity.https_username_password_required,
            )
            .optional_string("https_username", entity.https_username.as_deref());
        // Credentials come back redacted; local state keeps the configured values
        writer.finish()
    }
}

#[async_trait]
impl Resource for DistributionPointResource {
    fn type_name(&self) -> &str {
        "jamfpro_file_share_distribution_point"
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
            .description("Manages file share distribution points in Jamf Pro")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The unique identifier of the distribution point")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The unique name of the distribution point")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("ip_address", AttributeType::String)
                    .description("Hostname or IP address of the file server")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("connection_type", AttributeType::String)
                    .description("File sharing protocol, SMB or AFP")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("share_name", AttributeType::String)
                    .description("Name of the network share")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("is_master", AttributeType::Bool)
                    .description("Whether this is the principal distribution point")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("failover_point", AttributeType::String)
                    .description("Name of the distribution point to fail over to")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("share_port", AttributeType::Number)
                    .description("Port of the network share")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("enable_load_balancing", AttributeType::Bool)
                    .description("Whether load balancing is enabled")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("workgroup_or_domain", AttributeType::String)
                    .description("Workgroup or domain of the file server")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("read_only_username", AttributeType::String)
                    .description("Username for read-only access")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("read_only_password", AttributeType::String)
                    .description("Password for read-only access")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("read_write_username", AttributeType::String)
                    .description("Username for read-write access")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("read_write_password", AttributeType::String)
                    .description("Password for read-write access")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("https_downloads_enabled", AttributeType::Bool)
                    .description("Whether HTTPS downloads are enabled")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("http_url", AttributeType::String)
                    .description("URL used for HTTPS downloads")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("https_share_path", AttributeType::String)
                    .description("Path to the share on the HTTPS server")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("https_port", AttributeType::Number)
                    .description("Port used for HTTPS downloads")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("https_username_password_required", AttributeType::Bool)
                    .description("Whether HTTPS downloads require credentials")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("https_username", AttributeType::String)
                    .description("Username for HTTPS downloads")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("https_password", AttributeType::String)
                    .description("Password for HTTPS downloads")
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

        if let Ok(connection_type) = request
            .config
            .get_string(&AttributePath::new("connection_type"))
        {
            if !CONNECTION_TYPES.contains(&connection_type.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid connection type",
                        format!(
                            "Connection type must be one of: {:?}, got '{}'",
                            CONNECTION_TYPES, connection_type
                        ),
                    )
                    .with_attribute(AttributePath::new("connection_type")),
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
impl ResourceWithConfigure for DistributionPointResource {
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
impl ResourceWithImportState for DistributionPointResource {
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

    fn config_with_connection_type(connection_type: &str) -> DynamicValue {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("name"), "HQ Share".to_string())
            .unwrap();
        config
            .set_string(
                &AttributePath::new("ip_address"),
                "fileshare.example.com".to_string(),
            )
            .unwrap();
        config
            .set_string(
                &AttributePath::new("connection_type"),
                connection_type.to_string(),
            )
            .unwrap();
        config
            .set_string(&AttributePath::new("share_name"), "jamf".to_string())
            .unwrap();
        config
    }

    #[tokio::test]
    async fn validate_rejects_unknown_protocol() {
        let resource = DistributionPointResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_file_share_distribution_point".to_string(),
                    config: config_with_connection_type("NFS"),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn validate_accepts_smb_and_afp() {
        let resource = DistributionPointResource::new();
        for protocol in ["SMB", "AFP"] {
            let response = resource
                .validate(
                    Context::new(),
                    ValidateResourceConfigRequest {
                        type_name: "jamfpro_file_share_distribution_point".to_string(),
                        config: config_with_connection_type(protocol),
                    },
                )
                .await;
            assert!(response.diagnostics.is_empty(), "{} rejected", protocol);
        }
    }
}
