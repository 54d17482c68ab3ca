//! End-to-end provider tests against a mock Jamf Pro server

use jamfpro::JamfProProvider;
use mockito::{Server, ServerGuard};
use tfbridge::context::Context;
use tfbridge::data_source::{ConfigureDataSourceRequest, ReadDataSourceRequest};
use tfbridge::provider::{ConfigureProviderRequest, Provider};
use tfbridge::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest,
    ResourceWithConfigure, UpdateResourceRequest,
};
use tfbridge::types::{AttributePath, DynamicValue};

const TOKEN: &str = "integration-token";

async fn configured_provider(server: &ServerGuard) -> (JamfProProvider, ConfigureResourceRequest) {
    let mut provider = JamfProProvider::new();

    let mut config = DynamicValue::empty_object();
    config
        .set_string(&AttributePath::new("instance_url"), server.url())
        .unwrap();
    config
        .set_string(&AttributePath::new("auth_token"), TOKEN.to_string())
        .unwrap();

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

    (
        provider,
        ConfigureResourceRequest {
            provider_data: response.provider_data,
        },
    )
}

fn package_config(name: &str, category: &str) -> DynamicValue {
    let mut config = DynamicValue::empty_object();
    config
        .set_string(&AttributePath::new("name"), name.to_string())
        .unwrap();
    config
        .set_string(&AttributePath::new("category"), category.to_string())
        .unwrap();
    config
}

#[tokio::test(flavor = "multi_thread")]
async fn package_resource_full_lifecycle() {
    let mut server = Server::new_async().await;

    let create_mock = server
        .mock("POST", "/api/v1/packages")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"123","href":"/api/v1/packages/123"}"#)
        .create_async()
        .await;

    let get_mock = server
        .mock("GET", "/api/v1/packages/123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"123","name":"Firefox.pkg","category":"Browsers","filename":"Firefox.pkg"}"#,
        )
        .create_async()
        .await;

    let (provider, configure_request) = configured_provider(&server).await;

    let registry = provider.resources();
    let factory = registry.get("jamfpro_package").unwrap();
    let mut resource = factory();

    let configured = resource
        .configure(Context::new(), configure_request)
        .await;
    assert!(configured.diagnostics.is_empty());

    // Create: acknowledge, poll for visibility, reconcile the read-back
    let create_response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "jamfpro_package".to_string(),
                planned_state: package_config("Firefox.pkg", "Browsers"),
                config: package_config("Firefox.pkg", "Browsers"),
            },
        )
        .await;

    assert!(!tfbridge::types::has_errors(&create_response.diagnostics));
    let state = create_response.new_state;
    assert_eq!(
        state.get_string(&AttributePath::new("id")).unwrap(),
        "123"
    );
    assert_eq!(
        state.get_string(&AttributePath::new("filename")).unwrap(),
        "Firefox.pkg"
    );
    create_mock.assert_async().await;
    get_mock.assert_async().await;

    // Refresh reads the same object back
    let read_response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "jamfpro_package".to_string(),
                current_state: state.clone(),
            },
        )
        .await;
    assert!(read_response.diagnostics.is_empty());
    let refreshed = read_response.new_state.expect("state should survive read");
    assert_eq!(
        refreshed.get_string(&AttributePath::new("name")).unwrap(),
        "Firefox.pkg"
    );

    // Update pushes the new payload and reads back
    let update_mock = server
        .mock("PUT", "/api/v1/packages/123")
        .with_status(200)
        .create_async()
        .await;

    let mut planned = package_config("Firefox.pkg", "Internet");
    planned
        .set_string(&AttributePath::new("id"), "123".to_string())
        .unwrap();
    let update_response = resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: "jamfpro_package".to_string(),
                prior_state: state.clone(),
                planned_state: planned,
                config: package_config("Firefox.pkg", "Internet"),
            },
        )
        .await;
    assert!(!tfbridge::types::has_errors(&update_response.diagnostics));
    assert_eq!(
        update_response
            .new_state
            .get_string(&AttributePath::new("id"))
            .unwrap(),
        "123"
    );
    update_mock.assert_async().await;

    // Delete succeeds on the ID path
    let delete_mock = server
        .mock("DELETE", "/api/v1/packages/123")
        .with_status(204)
        .create_async()
        .await;

    let delete_response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "jamfpro_package".to_string(),
                prior_state: state,
            },
        )
        .await;
    assert!(delete_response.diagnostics.is_empty());
    delete_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn read_drops_state_when_remote_object_is_gone() {
    let mut server = Server::new_async().await;

    let get_mock = server
        .mock("GET", "/api/v1/packages/777")
        .with_status(404)
        .with_body(r#"{"httpStatus":404,"errors":[]}"#)
        .create_async()
        .await;

    let (provider, configure_request) = configured_provider(&server).await;
    let registry = provider.resources();
    let mut resource = registry.get("jamfpro_package").unwrap()();
    resource.configure(Context::new(), configure_request).await;

    let mut state = package_config("Ghost.pkg", "Unknown");
    state
        .set_string(&AttributePath::new("id"), "777".to_string())
        .unwrap();

    let read_response = resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: "jamfpro_package".to_string(),
                current_state: state,
            },
        )
        .await;

    assert!(read_response.new_state.is_none());
    assert!(read_response.diagnostics.is_empty());
    get_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_falls_back_to_name_addressing() {
    let mut server = Server::new_async().await;

    let delete_by_id_mock = server
        .mock("DELETE", "/api/v1/packages/55")
        .with_status(409)
        .with_body(
            r#"{"httpStatus":409,"errors":[{"code":"CONFLICT","description":"locked","field":null}]}"#,
        )
        .create_async()
        .await;

    let delete_by_name_mock = server
        .mock("DELETE", "/api/v1/packages/name/Locked.pkg")
        .with_status(204)
        .create_async()
        .await;

    let (provider, configure_request) = configured_provider(&server).await;
    let registry = provider.resources();
    let mut resource = registry.get("jamfpro_package").unwrap()();
    resource.configure(Context::new(), configure_request).await;

    let mut state = package_config("Locked.pkg", "Unknown");
    state
        .set_string(&AttributePath::new("id"), "55".to_string())
        .unwrap();

    let delete_response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "jamfpro_package".to_string(),
                prior_state: state,
            },
        )
        .await;

    assert!(delete_response.diagnostics.is_empty());
    delete_by_id_mock.assert_async().await;
    delete_by_name_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn version_data_source_reads_server_version() {
    let mut server = Server::new_async().await;

    let version_mock = server
        .mock("GET", "/api/v1/jamf-pro-version")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"version":"11.7.1-t1720012345"}"#)
        .create_async()
        .await;

    let (provider, configure_request) = configured_provider(&server).await;

    let registry = provider.data_sources();
    let mut data_source = registry.get("jamfpro_version").unwrap()();

    let configured = data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: configure_request.provider_data,
            },
        )
        .await;
    assert!(configured.diagnostics.is_empty());

    let read_response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "jamfpro_version".to_string(),
                config: DynamicValue::empty_object(),
            },
        )
        .await;

    assert!(read_response.diagnostics.is_empty());
    assert_eq!(
        read_response
            .state
            .get_string(&AttributePath::new("version"))
            .unwrap(),
        "11.7.1-t1720012345"
    );
    version_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn version_data_source_surfaces_auth_failures() {
    let mut server = Server::new_async().await;

    let _version_mock = server
        .mock("GET", "/api/v1/jamf-pro-version")
        .with_status(401)
        .with_body(r#"{"httpStatus":401,"errors":[]}"#)
        .create_async()
        .await;

    let (provider, configure_request) = configured_provider(&server).await;

    let registry = provider.data_sources();
    let mut data_source = registry.get("jamfpro_version").unwrap()();
    data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: configure_request.provider_data,
            },
        )
        .await;

    let read_response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: "jamfpro_version".to_string(),
                config: DynamicValue::empty_object(),
            },
        )
        .await;

    assert!(tfbridge::types::has_errors(&read_response.diagnostics));
    assert!(read_response.diagnostics[0]
        .summary
        .contains("Failed to get version information"));
}
