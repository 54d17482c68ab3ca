//! Mobile device configuration profile resource implementation
//!
//! The scope block is the hardest part of this resource: the API returns
//! membership lists in arbitrary order and fills unused sub-blocks with
//! empty containers. Reconciliation sorts every list and drops empty
//! limitations/exclusions entirely so refresh never produces a spurious
//! diff.

use std::collections::HashMap;
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
use tfbridge::schema::{
    AttributeBuilder, AttributeType, BlockBuilder, NestingMode, SchemaBuilder,
};
use tfbridge::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::common::ScopeEntity;
use crate::api::configuration_profiles::{
    ConfigurationProfile, ProfileScope, ScopeExclusions, ScopeLimitations,
};
use crate::api::{ApiError, Client};
use crate::crud::state::{
    flatten_and_sort_ids, flatten_and_sort_names, ids_to_dynamic, names_to_dynamic, StateWriter,
};
use crate::crud::{self, ResourceApi, Timeouts};

const PROFILE_LEVELS: &[&str] = &["Device Level", "User Level"];

#[derive(Default)]
pub struct ConfigurationProfileResource {
    provider_data: Option<crate::JamfProProviderData>,
}

impl ConfigurationProfileResource {
    pub fn new() -> Self {
        Self::default()
    }

    fn handler(&self) -> Result<ConfigurationProfileHandler, Diagnostic> {
        match &self.provider_data {
            Some(data) => Ok(ConfigurationProfileHandler {
                client: data.client.clone(),
            }),
            None => Err(Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )),
        }
    }
}

struct ConfigurationProfileHandler {
    client: Arc<Client>,
}

fn scope_path(attribute: &str) -> AttributePath {
    AttributePath::new("scope").attribute(attribute)
}

fn sub_block_path(block: &str, attribute: &str) -> AttributePath {
    AttributePath::new("scope").attribute(block).attribute(attribute)
}

/// Read an ID list attribute from config into scope entities
fn entities_from_ids(config: &DynamicValue, path: &AttributePath) -> Vec<ScopeEntity> {
    config
        .get_list(path)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            Dynamic::Number(n) => Some(ScopeEntity::with_id(n as i64)),
            _ => None,
        })
        .collect()
}

/// Read a name list attribute from config into scope entities
fn entities_from_names(config: &DynamicValue, path: &AttributePath) -> Vec<ScopeEntity> {
    config
        .get_list(path)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            Dynamic::String(name) => Some(ScopeEntity {
                id: 0,
                name: Some(name),
            }),
            _ => None,
        })
        .collect()
}

fn construct_limitations(config: &DynamicValue) -> Option<ScopeLimitations> {
    let limitations = ScopeLimitations {
        network_segments: entities_from_ids(
            config,
            &sub_block_path("limitations", "network_segment_ids"),
        ),
        ibeacons: entities_from_ids(config, &sub_block_path("limitations", "ibeacon_ids")),
        users: entities_from_names(
            config,
            &sub_block_path("limitations", "directory_service_or_local_usernames"),
        ),
        user_groups: entities_from_ids(
            config,
            &sub_block_path("limitations", "directory_service_usergroup_ids"),
        ),
    };

    let empty = limitations.network_segments.is_empty()
        && limitations.ibeacons.is_empty()
        && limitations.users.is_empty()
        && limitations.user_groups.is_empty();
    if empty {
        None
    } else {
        Some(limitations)
    }
}

fn construct_exclusions(config: &DynamicValue) -> Option<ScopeExclusions> {
    let exclusions = ScopeExclusions {
        mobile_devices: entities_from_ids(
            config,
            &sub_block_path("exclusions", "mobile_device_ids"),
        ),
        mobile_device_groups: entities_from_ids(
            config,
            &sub_block_path("exclusions", "mobile_device_group_ids"),
        ),
        buildings: entities_from_ids(config, &sub_block_path("exclusions", "building_ids")),
        departments: entities_from_ids(config, &sub_block_path("exclusions", "department_ids")),
        jss_users: entities_from_ids(config, &sub_block_path("exclusions", "jss_user_ids")),
        jss_user_groups: entities_from_ids(
            config,
            &sub_block_path("exclusions", "jss_user_group_ids"),
        ),
        network_segments: entities_from_ids(
            config,
            &sub_block_path("exclusions", "network_segment_ids"),
        ),
        users: entities_from_names(
            config,
            &sub_block_path("exclusions", "directory_service_or_local_usernames"),
        ),
        user_groups: entities_from_ids(
            config,
            &sub_block_path("exclusions", "directory_service_usergroup_ids"),
        ),
        ibeacons: entities_from_ids(config, &sub_block_path("exclusions", "ibeacon_ids")),
    };

    let empty = exclusions.mobile_devices.is_empty()
        && exclusions.mobile_device_groups.is_empty()
        && exclusions.buildings.is_empty()
        && exclusions.departments.is_empty()
        && exclusions.jss_users.is_empty()
        && exclusions.jss_user_groups.is_empty()
        && exclusions.network_segments.is_empty()
        && exclusions.users.is_empty()
        && exclusions.user_groups.is_empty()
        && exclusions.ibeacons.is_empty();
    if empty {
        None
    } else {
        Some(exclusions)
    }
}

/// Sorted, filtered ID list as a dynamic value, or None when nothing remains
fn id_list_entry(entities: &[ScopeEntity]) -> Option<Dynamic> {
    let ids = flatten_and_sort_ids(entities);
    if ids.is_empty() {
        None
    } else {
        Some(Dynamic::List(ids_to_dynamic(&ids)))
    }
}

fn name_list_entry(entities: &[ScopeEntity]) -> Option<Dynamic> {
    let names = flatten_and_sort_names(entities);
    if names.is_empty() {
        None
    } else {
        Some(Dynamic::List(names_to_dynamic(&names)))
    }
}

fn limitations_to_dynamic(limitations: &ScopeLimitations) -> Option<Dynamic> {
    let mut map = HashMap::new();
    if let Some(segments) = id_list_entry(&limitations.network_segments) {
        map.insert("network_segment_ids".to_string(), segments);
    }
    if let Some(ibeacons) = id_list_entry(&limitations.ibeacons) {
        map.insert("ibeacon_ids".to_string(), ibeacons);
    }
    if let Some(users) = name_list_entry(&limitations.users) {
        map.insert("directory_service_or_local_usernames".to_string(), users);
    }
    if let Some(groups) = id_list_entry(&limitations.user_groups) {
        map.insert("directory_service_usergroup_ids".to_string(), groups);
    }

    if map.is_empty() {
        None
    } else {
        Some(Dynamic::Map(map))
    }
}

fn exclusions_to_dynamic(exclusions: &ScopeExclusions) -> Option<Dynamic> {
    let mut map = HashMap::new();
    if let Some(devices) = id_list_entry(&exclusions.mobile_devices) {
        map.insert("mobile_device_ids".to_string(), devices);
    }
    if let Some(groups) = id_list_entry(&exclusions.mobile_device_groups) {
        map.insert("mobile_device_group_ids".to_string(), groups);
    }
    if let Some(buildings) = id_list_entry(&exclusions.buildings) {
        map.insert("building_ids".to_string(), buildings);
    }
    if let Some(departments) = id_list_entry(&exclusions.departments) {
        map.insert("department_ids".to_string(), departments);
    }
    if let Some(users) = id_list_entry(&exclusions.jss_users) {
        map.insert("jss_user_ids".to_string(), users);
    }
    if let Some(groups) = id_list_entry(&exclusions.jss_user_groups) {
        map.insert("jss_user_group_ids".to_string(), groups);
    }
    if let Some(segments) = id_list_entry(&exclusions.network_segments) {
        map.insert("network_segment_ids".to_string(), segments);
    }
    if let Some(users) = name_list_entry(&exclusions.users) {
        map.insert("directory_service_or_local_usernames".to_string(), users);
    }
    if let Some(groups) = id_list_entry(&exclusions.user_groups) {
        map.insert("directory_service_usergroup_ids".to_string(), groups);
    }
    if let Some(ibeacons) = id_list_entry(&exclusions.ibeacons) {
        map.insert("ibeacon_ids".to_string(), ibeacons);
    }

    if map.is_empty() {
        None
    } else {
        Some(Dynamic::Map(map))
    }
}

fn scope_to_dynamic(scope: &ProfileScope) -> HashMap<String, Dynamic> {
    let mut map = HashMap::new();
    map.insert(
        "all_mobile_devices".to_string(),
        Dynamic::Bool(scope.all_mobile_devices),
    );
    map.insert(
        "all_jss_users".to_string(),
        Dynamic::Bool(scope.all_jss_users),
    );
    map.insert(
        "mobile_device_ids".to_string(),
        Dynamic::List(ids_to_dynamic(&flatten_and_sort_ids(&scope.mobile_devices))),
    );
    map.insert(
        "mobile_device_group_ids".to_string(),
        Dynamic::List(ids_to_dynamic(&flatten_and_sort_ids(
            &scope.mobile_device_groups,
        ))),
    );
    map.insert(
        "jss_user_ids".to_string(),
        Dynamic::List(ids_to_dynamic(&flatten_and_sort_ids(&scope.jss_users))),
    );
    map.insert(
        "jss_user_group_ids".to_string(),
        Dynamic::List(ids_to_dynamic(&flatten_and_sort_ids(&scope.jss_user_groups))),
    );
    map.insert(
        "building_ids".to_string(),
        Dynamic::List(ids_to_dynamic(&flatten_and_sort_ids(&scope.buildings))),
    );
    map.insert(
        "department_ids".to_string(),
        Dynamic::List(ids_to_dynamic(&flatten_and_sort_ids(&scope.departments))),
    );

    if let Some(limitations) = scope
        .limitations
        .as_ref()
        .and_then(limitations_to_dynamic)
    {
        map.insert("limitations".to_string(), limitations);
    }
    if let Some(exclusions) = scope.exclusions.as_ref().and_then(exclusions_to_dynamic) {
        map.insert("exclusions".to_string(), exclusions);
    }

    map
}

#[async_trait]
impl ResourceApi for ConfigurationProfileHandler {
    type Payload = ConfigurationProfile;
    type Entity = ConfigurationProfile;

    fn display_name(&self) -> &'static str {
        "Jamf Pro Mobile Device Configuration Profile"
    }

    fn construct(&self, config: &DynamicValue) -> Result<ConfigurationProfile, Diagnostic> {
        let name = config
            .get_string(&AttributePath::new("name"))
            .map_err(|_| Diagnostic::error("Missing name", "The 'name' attribute is required"))?;

        let site = config
            .get_i64(&AttributePath::new("site_id"))
            .ok()
            .map(ScopeEntity::with_id);
        let category = config
            .get_i64(&AttributePath::new("category_id"))
            .ok()
            .map(ScopeEntity::with_id);

        let scope = ProfileScope {
            all_mobile_devices: config
                .get_bool(&scope_path("all_mobile_devices"))
                .unwrap_or(false),
            all_jss_users: config
                .get_bool(&scope_path("all_jss_users"))
                .unwrap_or(false),
            mobile_devices: entities_from_ids(config, &scope_path("mobile_device_ids")),
            mobile_device_groups: entities_from_ids(
                config,
                &scope_path("mobile_device_group_ids"),
            ),
            jss_users: entities_from_ids(config, &scope_path("jss_user_ids")),
            jss_user_groups: entities_from_ids(config, &scope_path("jss_user_group_ids")),
            buildings: entities_from_ids(config, &scope_path("building_ids")),
            departments: entities_from_ids(config, &scope_path("department_ids")),
            limitations: construct_limitations(config),
            exclusions: construct_exclusions(config),
        };

        Ok(ConfigurationProfile {
            id: None,
            name,
            description: config.get_string(&AttributePath::new("description")).ok(),
            uuid: None,
            deployment_method: config
                .get_string(&AttributePath::new("deployment_method"))
                .ok(),
            level: config.get_string(&AttributePath::new("level")).ok(),
            redeploy_on_update: config
                .get_string(&AttributePath::new("redeploy_on_update"))
                .ok(),
            redeploy_days_before_cert_expires: config
                .get_i64(&AttributePath::new("redeploy_days_before_cert_expires"))
                .ok(),
            payloads: config.get_string(&AttributePath::new("payloads")).ok(),
            site,
            category,
            scope,
        })
    }

    async fn create(&self, payload: &ConfigurationProfile) -> Result<String, ApiError> {
        let created = self.client.configuration_profiles().create(payload).await?;
        Ok(created.id)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<ConfigurationProfile, ApiError> {
        self.client.configuration_profiles().get(id).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<ConfigurationProfile, ApiError> {
        self.client.configuration_profiles().get_by_name(name).await
    }

    async fn update_by_id(&self, id: &str, payload: &ConfigurationProfile) -> Result<(), ApiError> {
        self.client.configuration_profiles().update(id, payload).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.client.configuration_profiles().delete(id).await
    }

    async fn delete_by_name(&self, name: &str) -> Result<(), ApiError> {
        self.client.configuration_profiles().delete_by_name(name).await
    }

    fn reconcile(&self, entity: &ConfigurationProfile, state: &mut DynamicValue) -> Vec<Diagnostic> {
        let mut writer = StateWriter::new(state);
        writer
            .string("name", &entity.name)
            .optional_string("description", entity.description.as_deref())
            .optional_string("uuid", entity.uuid.as_deref())
            .optional_string("deployment_method", entity.deployment_method.as_deref())
            .optional_string("redeploy_on_update", entity.redeploy_on_update.as_deref())
            .optional_i64(
                "redeploy_days_before_cert_expires",
                entity.redeploy_days_before_cert_expires,
            )
            .optional_string("payloads", entity.payloads.as_deref());

        // The API reports "System" for device-level profiles
        if let Some(level) = entity.level.as_deref() {
            let level = if level == "System" { "Device Level" } else { level };
            writer.string("level", level);
        }

        match entity.site.as_ref().filter(|s| s.id > 0) {
            Some(site) => writer.i64("site_id", site.id),
            None => writer.omit("site_id"),
        };
        match entity.category.as_ref().filter(|c| c.id > 0) {
            Some(category) => writer.i64("category_id", category.id),
            None => writer.omit("category_id"),
        };

        let mut diagnostics = writer.finish();

        let scope = scope_to_dynamic(&entity.scope);
        if let Err(e) = state.set_map(&AttributePath::new("scope"), scope) {
            diagnostics.push(
                Diagnostic::error("Failed to sync attribute scope", e.to_string())
                    .with_attribute(AttributePath::new("scope")),
            );
        }

        diagnostics
    }
}

fn id_list_attribute(name: &str, description: &str) -> tfbridge::schema::Attribute {
    AttributeBuilder::new(name, AttributeType::List(Box::new(AttributeType::Number)))
        .description(description)
        .optional()
        .build()
}

fn limitations_block(type_name: &str) -> tfbridge::schema::NestedBlock {
    BlockBuilder::new(type_name, NestingMode::Single)
        .attribute(id_list_attribute(
            "network_segment_ids",
            "Network segment IDs",
        ))
        .attribute(id_list_attribute("ibeacon_ids", "iBeacon IDs"))
        .attribute(
            AttributeBuilder::new(
                "directory_service_or_local_usernames",
                AttributeType::List(Box::new(AttributeType::String)),
            )
            .description("Directory service or local usernames")
            .optional()
            .build(),
        )
        .attribute(id_list_attribute(
            "directory_service_usergroup_ids",
            "Directory service user group IDs",
        ))
        .build()
}

#[async_trait]
impl Resource for ConfigurationProfileResource {
    fn type_name(&self) -> &str {
        "jamfpro_mobile_device_configuration_profile"
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
        let scope_block = BlockBuilder::new("scope", NestingMode::Single)
            .description("Which devices and users the profile applies to")
            .attribute(
                AttributeBuilder::new("all_mobile_devices", AttributeType::Bool)
                    .description("Apply the profile to all mobile devices")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("all_jss_users", AttributeType::Bool)
                    .description("Apply the profile to all Jamf Pro users")
                    .optional()
                    .build(),
            )
            .attribute(id_list_attribute("mobile_device_ids", "Mobile device IDs"))
            .attribute(id_list_attribute(
                "mobile_device_group_ids",
                "Mobile device group IDs",
            ))
            .attribute(id_list_attribute("jss_user_ids", "Jamf Pro user IDs"))
            .attribute(id_list_attribute(
                "jss_user_group_ids",
                "Jamf Pro user group IDs",
            ))
            .attribute(id_list_attribute("building_ids", "Building IDs"))
            .attribute(id_list_attribute("department_ids", "Department IDs"))
            .block(limitations_block("limitations"))
            .block(
                BlockBuilder::new("exclusions", NestingMode::Single)
                    .attribute(id_list_attribute("mobile_device_ids", "Mobile device IDs"))
                    .attribute(id_list_attribute(
                        "mobile_device_group_ids",
                        "Mobile device group IDs",
                    ))
                    .attribute(id_list_attribute("building_ids", "Building IDs"))
                    .attribute(id_list_attribute("department_ids", "Department IDs"))
                    .attribute(id_list_attribute("jss_user_ids", "Jamf Pro user IDs"))
                    .attribute(id_list_attribute(
                        "jss_user_group_ids",
                        "Jamf Pro user group IDs",
                    ))
                    .attribute(id_list_attribute(
                        "network_segment_ids",
                        "Network segment IDs",
                    ))
                    .attribute(
                        AttributeBuilder::new(
                            "directory_service_or_local_usernames",
                            AttributeType::List(Box::new(AttributeType::String)),
                        )
                        .description("Directory service or local usernames")
                        .optional()
                        .build(),
                    )
                    .attribute(id_list_attribute(
                        "directory_service_usergroup_ids",
                        "Directory service user group IDs",
                    ))
                    .attribute(id_list_attribute("ibeacon_ids", "iBeacon IDs"))
                    .build(),
            )
            .build();

        let schema = SchemaBuilder::new()
            .version(0)
            .description("Manages mobile device configuration profiles in Jamf Pro")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .description("The unique identifier of the configuration profile")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .description("The unique name of the configuration profile")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .description("Description of the configuration profile")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("uuid", AttributeType::String)
                    .description("The UUID assigned by Jamf Pro")
                    .computed()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("deployment_method", AttributeType::String)
                    .description("How the profile is deployed (Install Automatically or Make Available in Self Service)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("level", AttributeType::String)
                    .description("Whether the profile applies at Device Level or User Level")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("redeploy_on_update", AttributeType::String)
                    .description("Redeploy behavior when the profile is updated")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("redeploy_days_before_cert_expires", AttributeType::Number)
                    .description("Days before certificate expiry to redeploy")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("payloads", AttributeType::String)
                    .description("The profile payload plist")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("site_id", AttributeType::Number)
                    .description("ID of the site the profile belongs to")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("category_id", AttributeType::Number)
                    .description("ID of the category the profile belongs to")
                    .optional()
                    .build(),
            )
            .block(scope_block)
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

        if let Ok(level) = request.config.get_string(&AttributePath::new("level")) {
            if !PROFILE_LEVELS.contains(&level.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid level",
                        format!("Level must be one of: {:?}, got '{}'", PROFILE_LEVELS, level),
                    )
                    .with_attribute(AttributePath::new("level")),
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
impl ResourceWithConfigure for ConfigurationProfileResource {
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
impl ResourceWithImportState for ConfigurationProfileResource {
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

    fn entity(id: i64) -> ScopeEntity {
        ScopeEntity::with_id(id)
    }

    fn handler() -> ConfigurationProfileHandler {
        ConfigurationProfileHandler {
            client: Arc::new(Client::new("https://example.jamfcloud.com", "t", false).unwrap()),
        }
    }

    fn profile_with_scope(scope: ProfileScope) -> ConfigurationProfile {
        ConfigurationProfile {
            id: Some("12".to_string()),
            name: "WiFi Profile".to_string(),
            level: Some("System".to_string()),
            scope,
            ..Default::default()
        }
    }

    fn scope_map(state: &DynamicValue) -> HashMap<String, Dynamic> {
        state.get_map(&AttributePath::new("scope")).unwrap()
    }

    #[test]
    fn reconcile_sorts_scope_ids_regardless_of_remote_order() {
        let profile = profile_with_scope(ProfileScope {
            mobile_device_groups: vec![entity(9), entity(3), entity(0), entity(7)],
            ..Default::default()
        });

        let mut state = DynamicValue::empty_object();
        let diags = handler().reconcile(&profile, &mut state);
        assert!(diags.is_empty());

        let scope = scope_map(&state);
        assert_eq!(
            scope["mobile_device_group_ids"],
            Dynamic::List(vec![
                Dynamic::Number(3.0),
                Dynamic::Number(7.0),
                Dynamic::Number(9.0)
            ])
        );
    }

    #[test]
    fn reconcile_omits_empty_limitations_and_exclusions() {
        let profile = profile_with_scope(ProfileScope {
            limitations: Some(ScopeLimitations::default()),
            exclusions: Some(ScopeExclusions {
                mobile_devices: vec![entity(0)],
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut state = DynamicValue::empty_object();
        handler().reconcile(&profile, &mut state);

        let scope = scope_map(&state);
        assert!(!scope.contains_key("limitations"));
        assert!(!scope.contains_key("exclusions"));
    }

    #[test]
    fn reconcile_keeps_populated_exclusions() {
        let profile = profile_with_scope(ProfileScope {
            exclusions: Some(ScopeExclusions {
                buildings: vec![entity(8), entity(4)],
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut state = DynamicValue::empty_object();
        handler().reconcile(&profile, &mut state);

        let scope = scope_map(&state);
        match &scope["exclusions"] {
            Dynamic::Map(exclusions) => {
                assert_eq!(
                    exclusions["building_ids"],
                    Dynamic::List(vec![Dynamic::Number(4.0), Dynamic::Number(8.0)])
                );
            }
            other => panic!("expected exclusions map, got {:?}", other),
        }
    }

    #[test]
    fn reconcile_is_idempotent() {
        let profile = profile_with_scope(ProfileScope {
            buildings: vec![entity(5), entity(2)],
            limitations: Some(ScopeLimitations {
                network_segments: vec![entity(4), entity(1)],
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut first = DynamicValue::empty_object();
        handler().reconcile(&profile, &mut first);
        let mut second = first.clone();
        handler().reconcile(&profile, &mut second);

        assert_eq!(scope_map(&first), scope_map(&second));
    }

    #[test]
    fn reconcile_normalizes_system_level() {
        let profile = profile_with_scope(ProfileScope::default());

        let mut state = DynamicValue::empty_object();
        handler().reconcile(&profile, &mut state);

        assert_eq!(
            state.get_string(&AttributePath::new("level")).unwrap(),
            "Device Level"
        );
    }

    #[test]
    fn reconcile_omits_unset_site_and_category() {
        let profile = profile_with_scope(ProfileScope::default());

        let mut state = DynamicValue::empty_object();
        state
            .set_number(&AttributePath::new("site_id"), -1.0)
            .unwrap();
        handler().reconcile(&profile, &mut state);

        assert!(state.get_i64(&AttributePath::new("site_id")).is_err());
        assert!(state.get_i64(&AttributePath::new("category_id")).is_err());
    }

    #[test]
    fn construct_builds_nested_scope_from_config() {
        let mut config = DynamicValue::empty_object();
        config
            .set_string(&AttributePath::new("name"), "WiFi Profile".to_string())
            .unwrap();
        let mut scope = HashMap::new();
        scope.insert("all_mobile_devices".to_string(), Dynamic::Bool(true));
        scope.insert(
            "building_ids".to_string(),
            Dynamic::List(vec![Dynamic::Number(2.0), Dynamic::Number(1.0)]),
        );
        let mut limitations = HashMap::new();
        limitations.insert(
            "network_segment_ids".to_string(),
            Dynamic::List(vec![Dynamic::Number(9.0)]),
        );
        scope.insert("limitations".to_string(), Dynamic::Map(limitations));
        config
            .set_map(&AttributePath::new("scope"), scope)
            .unwrap();

        let payload = handler().construct(&config).unwrap();

        assert!(payload.scope.all_mobile_devices);
        assert_eq!(payload.scope.buildings.len(), 2);
        let limitations = payload.scope.limitations.unwrap();
        assert_eq!(limitations.network_segments[0].id, 9);
        assert!(payload.scope.exclusions.is_none());
    }
}
