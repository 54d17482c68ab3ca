//! Generic CRUD orchestration for Jamf Pro resources
//!
//! Every resource follows the same lifecycle against an eventually
//! consistent API: construct a payload from config, mutate with retries,
//! wait for the object to propagate, then read back and reconcile state.
//! The orchestrator owns that sequencing; resources supply the typed
//! endpoint calls through [`ResourceApi`].

pub mod retry;
pub mod state;
pub mod waitfor;

use std::time::Duration;

use async_trait::async_trait;
use tfbridge::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfbridge::{AttributePath, Context, Diagnostic, DynamicValue};

use crate::api::ApiError;
use retry::{execute_with_retry, RetryError};
use waitfor::{wait_until_available, WaitError};

/// Per-operation deadlines for one resource type
#[derive(Debug, Clone)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
    /// How long a freshly created object may take to become readable
    pub propagation: Duration,
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(70),
            read: Duration::from_secs(30),
            update: Duration::from_secs(30),
            delete: Duration::from_secs(15),
            propagation: Duration::from_secs(45),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Typed endpoint surface one resource exposes to the orchestrator
#[async_trait]
pub trait ResourceApi: Send + Sync {
    type Payload: Send + Sync;
    type Entity: Send + Sync;

    /// Human-readable resource name for diagnostics and log lines
    fn display_name(&self) -> &'static str;

    /// Build the API payload from validated configuration
    fn construct(&self, config: &DynamicValue) -> Result<Self::Payload, Diagnostic>;

    async fn create(&self, payload: &Self::Payload) -> Result<String, ApiError>;
    async fn fetch_by_id(&self, id: &str) -> Result<Self::Entity, ApiError>;
    async fn fetch_by_name(&self, name: &str) -> Result<Self::Entity, ApiError>;
    async fn update_by_id(&self, id: &str, payload: &Self::Payload) -> Result<(), ApiError>;
    async fn delete_by_id(&self, id: &str) -> Result<(), ApiError>;
    async fn delete_by_name(&self, name: &str) -> Result<(), ApiError>;

    /// Map the remote entity onto local state. Must be idempotent.
    fn reconcile(&self, entity: &Self::Entity, state: &mut DynamicValue) -> Vec<Diagnostic>;
}

/// Create the remote object, record its identity, wait for propagation,
/// then read back. A propagation timeout downgrades to a warning: the
/// mutation itself succeeded and the identity must survive.
pub async fn create<A: ResourceApi>(
    ctx: &Context,
    api: &A,
    timeouts: &Timeouts,
    request: CreateResourceRequest,
) -> CreateResourceResponse {
    let mut diagnostics = Vec::new();

    let payload = match api.construct(&request.config) {
        Ok(payload) => payload,
        Err(diag) => {
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics: vec![diag],
            }
        }
    };

    let id = match execute_with_retry(ctx, timeouts.create, || api.create(&payload)).await {
        Ok(id) => id,
        Err(e) => {
            diagnostics.push(Diagnostic::error(
                format!("Failed to create {}", api.display_name()),
                e.to_string(),
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                diagnostics,
            };
        }
    };

    let mut new_state = request.planned_state;
    if let Err(e) = new_state.set_string(&AttributePath::new("id"), id.clone()) {
        diagnostics.push(Diagnostic::error(
            format!("Failed to record {} identity", api.display_name()),
            e.to_string(),
        ));
        return CreateResourceResponse {
            new_state,
            diagnostics,
        };
    }

    match wait_until_available(
        ctx,
        api.display_name(),
        &id,
        || api.fetch_by_id(&id),
        timeouts.poll_interval,
        timeouts.propagation,
    )
    .await
    {
        Ok(entity) => {
            diagnostics.extend(api.reconcile(&entity, &mut new_state));
        }
        Err(WaitError::Timeout { waited, .. }) => {
            tracing::warn!(
                "{} with ID {} created but not yet readable after {:?}",
                api.display_name(),
                id,
                waited
            );
            diagnostics.push(Diagnostic::warning(
                format!("{} created but not yet available", api.display_name()),
                format!(
                    "The {} with ID {} was created but did not become readable within {:?}. \
                     State will be synchronized on the next refresh.",
                    api.display_name(),
                    id,
                    waited
                ),
            ));
        }
        Err(e) => {
            diagnostics.push(Diagnostic::error(
                format!("Failed to read back {} after create", api.display_name()),
                e.to_string(),
            ));
        }
    }

    CreateResourceResponse {
        new_state,
        diagnostics,
    }
}

/// Fetch by identity and reconcile. A missing remote object clears local
/// state without error so the next plan recreates it.
pub async fn read<A: ResourceApi>(
    ctx: &Context,
    api: &A,
    timeouts: &Timeouts,
    request: ReadResourceRequest,
) -> ReadResourceResponse {
    let id = match request.current_state.get_string(&AttributePath::new("id")) {
        Ok(id) => id,
        Err(_) => {
            return ReadResourceResponse {
                new_state: None,
                diagnostics: Vec::new(),
            }
        }
    };

    match execute_with_retry(ctx, timeouts.read, || api.fetch_by_id(&id)).await {
        Ok(entity) => {
            let mut new_state = request.current_state;
            let diagnostics = api.reconcile(&entity, &mut new_state);
            ReadResourceResponse {
                new_state: Some(new_state),
                diagnostics,
            }
        }
        Err(RetryError::Terminal(e)) if e.is_not_found() => {
            tracing::debug!(
                "{} with ID {} no longer exists, dropping local state",
                api.display_name(),
                id
            );
            ReadResourceResponse {
                new_state: None,
                diagnostics: Vec::new(),
            }
        }
        Err(e) => ReadResourceResponse {
            new_state: Some(request.current_state),
            diagnostics: vec![Diagnostic::error(
                format!("Failed to read {}", api.display_name()),
                e.to_string(),
            )],
        },
    }
}

/// Update in place and read back. Identity never changes on update.
pub async fn update<A: ResourceApi>(
    ctx: &Context,
    api: &A,
    timeouts: &Timeouts,
    request: UpdateResourceRequest,
) -> UpdateResourceResponse {
    let id = match request.prior_state.get_string(&AttributePath::new("id")) {
        Ok(id) => id,
        Err(e) => {
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![Diagnostic::error(
                    format!("Cannot update {} without an ID", api.display_name()),
                    e.to_string(),
                )],
            }
        }
    };

    let payload = match api.construct(&request.config) {
        Ok(payload) => payload,
        Err(diag) => {
            return UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics: vec![diag],
            }
        }
    };

    if let Err(e) = execute_with_retry(ctx, timeouts.update, || api.update_by_id(&id, &payload)).await
    {
        return UpdateResourceResponse {
            new_state: request.prior_state,
            diagnostics: vec![Diagnostic::error(
                format!("Failed to update {} with ID {}", api.display_name(), id),
                e.to_string(),
            )],
        };
    }

    let mut new_state = request.planned_state;
    if let Err(e) = new_state.set_string(&AttributePath::new("id"), id.clone()) {
        return UpdateResourceResponse {
            new_state: request.prior_state,
            diagnostics: vec![Diagnostic::error(
                format!("Failed to record {} identity", api.display_name()),
                e.to_string(),
            )],
        };
    }

    let mut diagnostics = Vec::new();
    match execute_with_retry(ctx, timeouts.read, || api.fetch_by_id(&id)).await {
        Ok(entity) => diagnostics.extend(api.reconcile(&entity, &mut new_state)),
        Err(e) => diagnostics.push(Diagnostic::error(
            format!("Failed to read back {} after update", api.display_name()),
            e.to_string(),
        )),
    }

    UpdateResourceResponse {
        new_state,
        diagnostics,
    }
}

/// Delete by identity with a name fallback. A missing remote object counts
/// as success on either path; the API sometimes loses ID addressability
/// before name addressability during propagation.
pub async fn delete<A: ResourceApi>(
    ctx: &Context,
    api: &A,
    timeouts: &Timeouts,
    request: DeleteResourceRequest,
) -> DeleteResourceResponse {
    let id = match request.prior_state.get_string(&AttributePath::new("id")) {
        Ok(id) => id,
        Err(_) => {
            // Nothing was ever created, nothing to delete
            return DeleteResourceResponse {
                diagnostics: Vec::new(),
            };
        }
    };
    let name = request
        .prior_state
        .get_string(&AttributePath::new("name"))
        .ok();

    let id_result = execute_with_retry(ctx, timeouts.delete, || async {
        match api.delete_by_id(&id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    })
    .await;

    // The name path is a last resort: names are not guaranteed unique, so
    // it only runs once the retried ID path has failed for good.
    let result = match (id_result, &name) {
        (Ok(()), _) => Ok(()),
        (Err(id_err), Some(name)) => {
            tracing::warn!(
                "deleting {} by ID {} failed ({}), falling back to name",
                api.display_name(),
                id,
                id_err
            );
            execute_with_retry(ctx, timeouts.delete, || async {
                match api.delete_by_name(name).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_not_found() => Ok(()),
                    Err(e) => Err(e),
                }
            })
            .await
        }
        (Err(id_err), None) => Err(id_err),
    };

    match result {
        Ok(()) => DeleteResourceResponse {
            diagnostics: Vec::new(),
        },
        Err(e) => DeleteResourceResponse {
            diagnostics: vec![Diagnostic::error(
                format!("Failed to delete {} with ID {}", api.display_name(), id),
                e.to_string(),
            )],
        },
    }
}
