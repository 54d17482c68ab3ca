//! Account resource implementation

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
use tfbridge::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::accounts::{Account, ACCESS_LEVELS, PRIVILEGE_SETS};
use crate::api::{ApiError, Client};
use crate::crud::state::{names_to_dynamic, StateWriter};
use crate::crud::{self, ResourceApi, Timeouts};

const ENABLED_VALUES: &[&str] = &["Enabled", "Disabled"];

#[derive(Default)]
pub struct AccountResource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl AccountResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn handler(&self) -> Result<AccountHandler, Diagnostic> {
        match &self.provider_data {
            Some(data) => Ok(AccountHandler {
                client: data.client.clone(),
            }),
            None => Err(Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )),
        }
    }
}

struct AccountHandler {
    client: Arc<Client>,
}

fn strings_from_config(config: &DynamicValue, attribute: &str) -> Vec<String> {
    config
        .get_list(&AttributePath::new(attribute))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            Dynamic::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn sorted(mut privileges: Vec<String>) -> Vec<String> {
    privileges.sort();
    privileges
}

#[async_trait]
impl ResourceApi for AccountHandler {
    type Payload = Account;
    type Entity = Account;

    fn display_name(&self) -> &'static str {
        "Jamf Pro Account"
    }

    fn construct(&self, config: &DynamicValue) -> Result<Account, Diagnostic> {
        let name = config
            .get_string(&AttributePath::new("name"))
            .map_err(|_| Diagnostic::error("Missing name", "The 'name' attribute is required"))?;
        let enabled = config
            .get_string(&AttributePath::new("enabled"))
            .map_err(|_| {
                Diagnostic::error("Missing enabled", "The 'enabled' attribute is required")
            })?;
        let access_level = config
            .get_string(&AttributePath::new("access_level"))
            .map_err(|_| {
                Diagnostic::error(
                    "Missing access_level",
                    "The 'access_level' attribute is required",
                )
            })?;
        let privilege_set = config
            .get_string(&AttributePath::new("privilege_set"))
            .map_err(|_| {
                Diagnostic::error(
                    "Missing privilege_set",
                    "The 'privilege_set' attribute is required",
                )
            })?;

        Ok(Account {
            id: None,
            name,
            full_name: config.get_string(&AttributePath::new("full_name")).ok(),
            email: config.get_string(&AttributePath::new("email")).ok(),
            enabled,
            access_level,
            privilege_set,
            password: config.get_string(&AttributePath::new("password")).ok(),
            jss_objects_privileges: strings_from_config(config, "jss_objects_privileges"),
            jss_settings_privileges: strings_from_config(config, "jss_settings_privileges"),
            jss_actions_privileges: strings_from_config(config, "jss_actions_privileges"),
        })
    }

    async fn create(&self, payload: &Account) -> Result<String, ApiError> {
        let created = self.client.accounts().create(payload).await?;
        Ok(created.id)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Account, ApiError> {
        self.client.accounts().get(id).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Account, ApiError> {
        self.client.accounts().get_by_name(name).await
    }

    async fn update_by_id(&self, id: &str, payload: &Account) -> Result<(), ApiError> {
        self.client.accounts().update(id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.client.accounts().delete(id).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        self.client.accounts().delete_by_name(name).await
    }

    fn reconcile(&self, entity: &Account, state: &mut DynamicValue) -> Vec<Diagnostic> {
        let mut writer = StateWriter::new(state);
        writer
            .string("name", &entity.name)
            .optional_string("full_name", entity.full_name.as_deref())
            .optional_string("email", entity.email.as_deref())
            .string("enabled", &entity.enabled)
            .string("access_level", &entity.access_level)
            .string("privilege_set", &entity.privilege_set)
            .list(
                "jss_objects_privileges",
                names_to_dynamic(&sorted(entity.jss_objects_privileges.clone())),
            )
            .list(
                "jss_settings_privileges",
                names_to_dynamic(&sorted(entity.jss_settings_privileges.clone())),
            )
            .list(
                "jss_actions_privileges",
                names_to_dynamic(&sorted(entity.jss_actions_privileges.clone())),
            );
        writer.finish()
    }
}

#[async_trait]
impl Resource for AccountResource {
    fn type_name(&self) -> &str {
        "jamfpro_account"
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
            .description("Manages user accounts in Jamf Pro")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The unique identifier of the account")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The unique username of the account")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("full_name", AttributeType::String)
                    .description("The full name of the account holder")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("email", AttributeType::String)
                    .description("The email address of the account holder")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("enabled", AttributeType::String)
                    .description("Whether the account is Enabled or Disabled")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("access_level", AttributeType::String)
                    .description("Access level: Full Access, Site Access or Group Access")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("privilege_set", AttributeType::String)
                    .description("Privilege set: Administrator, Auditor, Enrollment Only or Custom")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("password", AttributeType::String)
                    .description("The account password")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "jss_objects_privileges",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .description("Privileges over Jamf Pro objects")
                .optional()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "jss_settings_privileges",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .description("Privileges over Jamf Pro settings")
                .optional()
                .build(),
            )
            .attribute(
                AttributeBuilder::new(
                    "jss_actions_privileges",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .description("Privileges over Jamf Pro actions")
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

        if let Ok(enabled) = request.config.get_string(&AttributePath::new("enabled")) {
            if !ENABLED_VALUES.contains(&enabled.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid enabled value",
                        format!(
                            "Enabled must be one of: {:?}, got '{}'",
                            ENABLED_VALUES, enabled
                        ),
                    )
                    .with_attribute(AttributePath::new("enabled")),
                );
            }
        }

        if let Ok(access_level) = request
            .config
            .get_string(&AttributePath::new("access_level"))
        {
            if !ACCESS_LEVELS.contains(&access_level.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid access level",
                        format!(
                            "Access level must be one of: {:?}, got '{}'",
                            ACCESS_LEVELS, access_level
                        ),
                    )
                    .with_attribute(AttributePath::new("access_level")),
                );
            }
        }

        if let Ok(privilege_set) = request
            .config
            .get_string(&AttributePath::new("privilege_set"))
        {
            if !PRIVILEGE_SETS.contains(&privilege_set.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid privilege set",
                        format!(
                            "Privilege set must be one of: {:?}, got '{}'",
                            PRIVILEGE_SETS, privilege_set
                        ),
                    )
                    .with_attribute(AttributePath::new("privilege_set")),
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
impl ResourceWithConfigure for AccountResource {
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
impl ResourceWithImportState for AccountResource {
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

    fn account_config(enabled: &str, access_level: &str, privilege_set: &str) -> DynamicValue {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("name"), "helpdesk".to_string())
            .unwrap();
        config
            .set_string(&AttributePath::new("enabled"), enabled.to_string())
            .unwrap();
        config
            .set_string(
                &AttributePath::new("access_level"),
                access_level.to_string(),
            )
            .unwrap();
        config
            .set_string(
                &AttributePath::new("privilege_set"),
                privilege_set.to_string(),
            )
            .unwrap();
        config
    }

    #[tokio::test]
    async fn validate_rejects_bad_enumerations() {
        let resource = AccountResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_account".to_string(),
                    config: account_config("yes", "Root Access", "Superuser"),
                },
            )
            .await;

        assert_eq!(response.diagnostics.len(), 3);
    }

    #[tokio::test]
    async fn validate_accepts_valid_enumerations() {
        let resource = AccountResource::new();
        let response = resource
            .validate(
                Context::new(),
                ValidateResourceConfigRequest {
                    type_name: "jamfpro_account".to_string(),
                    config: account_config("Enabled", "Full Access", "Custom"),
                },
            )
            .await;

        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn reconcile_sorts_privilege_lists() {
        let handler = AccountHandler {
            client: Arc::new(Client::new("https://example.jamfcloud.com", "t", false).unwrap()),
        };
        let account = Account {
            id: Some("2".to_string()),
            name: "helpdesk".to_string(),
            enabled: "Enabled".to_string(),
            access_level: "Full Access".to_string(),
            privilege_set: "Custom".to_string(),
            jss_objects_privileges: vec![
                "Update Computers".to_string(),
                "Read Computers".to_string(),
            ],
            ..Default::default()
        };

        let mut state = DynamicValue::empty_object();
        let diags = handler.reconcile(&account, &mut state);
        assert!(diags.is_empty());

        let privileges = state
            .get_list(&AttributePath::new("jss_objects_privileges"))
            .unwrap();
        assert_eq!(
            privileges,
            vec![
                Dynamic::String("Read Computers".to_string()),
                Dynamic::String("Update Computers".to_string())
            ]
        );
    }
}
