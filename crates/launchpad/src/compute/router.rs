use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ComputeEnvironment, ComputeEnvironmentConfig, ComputeSpec, ComputeSpecConfig, ConfigId,
    Constraint, ConstraintConfig, Hardware, HardwareConfig, HardwareOptions,
};
use super::repository::{next_config_id, ComputeConfigStore, StoreError};
use super::resolver::{JobTemplateResolver, ResolveError};
use super::scope::{default_scope_rules, ExecutionContext, ScopeRules};

/// Router exposing the compute configuration CRUD surface and the plain
/// job-template resolution operations.
pub fn compute_router<S>(store: Arc<S>) -> Router
where
    S: ComputeConfigStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/compute/compute-spec-configs",
            post(create_compute_spec::<S>).get(list_compute_specs::<S>),
        )
        .route(
            "/api/v1/compute/compute-spec-configs/:id",
            get(get_compute_spec::<S>)
                .put(update_compute_spec::<S>)
                .delete(delete_compute_spec::<S>),
        )
        .route(
            "/api/v1/compute/hardware-configs",
            post(create_hardware::<S>).get(list_hardware::<S>),
        )
        .route(
            "/api/v1/compute/hardware-configs/:id",
            get(get_hardware::<S>)
                .put(update_hardware::<S>)
                .delete(delete_hardware::<S>),
        )
        .route(
            "/api/v1/compute/constraint-configs",
            post(create_constraint::<S>).get(list_constraints::<S>),
        )
        .route(
            "/api/v1/compute/constraint-configs/:id",
            get(get_constraint::<S>)
                .put(update_constraint::<S>)
                .delete(delete_constraint::<S>),
        )
        .route(
            "/api/v1/compute/environment-configs",
            post(create_environment::<S>).get(list_environments::<S>),
        )
        .route(
            "/api/v1/compute/environment-configs/:id",
            get(get_environment::<S>)
                .put(update_environment::<S>)
                .delete(delete_environment::<S>),
        )
        .route(
            "/api/v1/job-templates/available",
            post(job_template_available::<S>),
        )
        .route(
            "/api/v1/job-templates/resolve",
            post(job_template_resolve::<S>),
        )
        .with_state(store)
}

pub(crate) fn store_error_response(error: StoreError) -> Response {
    let status = match error {
        StoreError::Conflict => StatusCode::CONFLICT,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

/// Denial and NotFound carry different user-facing messages and must never
/// be conflated, so they map to distinct statuses.
pub(crate) fn resolve_error_response(error: ResolveError) -> Response {
    let status = match &error {
        ResolveError::NotFound { .. } => StatusCode::NOT_FOUND,
        ResolveError::Unavailable(_) => StatusCode::FORBIDDEN,
        ResolveError::InvalidConfiguration(_) | ResolveError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeSpecConfigRequest {
    pub compute_spec: ComputeSpec,
    #[serde(default)]
    pub scopes: Option<ScopeRules>,
    #[serde(default)]
    pub hardware_options: Option<HardwareOptions>,
}

impl ComputeSpecConfigRequest {
    fn into_config(self, id: ConfigId) -> ComputeSpecConfig {
        ComputeSpecConfig {
            id,
            compute_spec: self.compute_spec,
            scopes: self.scopes.unwrap_or_else(default_scope_rules),
            hardware_options: self.hardware_options.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareConfigRequest {
    pub hardware: Hardware,
    #[serde(default)]
    pub scopes: Option<ScopeRules>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintConfigRequest {
    pub constraint: Constraint,
    #[serde(default)]
    pub scopes: Option<ScopeRules>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfigRequest {
    pub environment: ComputeEnvironment,
    #[serde(default)]
    pub scopes: Option<ScopeRules>,
}

async fn create_compute_spec<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Json(request): Json<ComputeSpecConfigRequest>,
) -> Response {
    let config = request.into_config(next_config_id("spec"));
    match store.insert_compute_spec_config(config) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn list_compute_specs<S: ComputeConfigStore>(State(store): State<Arc<S>>) -> Response {
    match store.compute_spec_configs() {
        Ok(configs) => Json(configs).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn get_compute_spec<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.compute_spec_config(&ConfigId(id)) {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

async fn update_compute_spec<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<ComputeSpecConfigRequest>,
) -> Response {
    let config = request.into_config(ConfigId(id));
    match store.update_compute_spec_config(config.clone()) {
        Ok(()) => Json(config).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn delete_compute_spec<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.delete_compute_spec_config(&ConfigId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn create_hardware<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Json(request): Json<HardwareConfigRequest>,
) -> Response {
    let config = HardwareConfig {
        id: next_config_id("hw"),
        hardware: request.hardware,
        scopes: request.scopes.unwrap_or_else(default_scope_rules),
    };
    match store.insert_hardware_config(config) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn list_hardware<S: ComputeConfigStore>(State(store): State<Arc<S>>) -> Response {
    match store.hardware_configs() {
        Ok(configs) => Json(configs).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn get_hardware<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.hardware_config(&ConfigId(id)) {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

async fn update_hardware<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<HardwareConfigRequest>,
) -> Response {
    let config = HardwareConfig {
        id: ConfigId(id),
        hardware: request.hardware,
        scopes: request.scopes.unwrap_or_else(default_scope_rules),
    };
    match store.update_hardware_config(config.clone()) {
        Ok(()) => Json(config).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn delete_hardware<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.delete_hardware_config(&ConfigId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn create_constraint<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Json(request): Json<ConstraintConfigRequest>,
) -> Response {
    let config = ConstraintConfig {
        id: next_config_id("constraint"),
        constraint: request.constraint,
        scopes: request.scopes.unwrap_or_else(default_scope_rules),
    };
    match store.insert_constraint_config(config) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn list_constraints<S: ComputeConfigStore>(State(store): State<Arc<S>>) -> Response {
    match store.constraint_configs() {
        Ok(configs) => Json(configs).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn get_constraint<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.constraint_config(&ConfigId(id)) {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

async fn update_constraint<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<ConstraintConfigRequest>,
) -> Response {
    let config = ConstraintConfig {
        id: ConfigId(id),
        constraint: request.constraint,
        scopes: request.scopes.unwrap_or_else(default_scope_rules),
    };
    match store.update_constraint_config(config.clone()) {
        Ok(()) => Json(config).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn delete_constraint<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.delete_constraint_config(&ConfigId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn create_environment<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Json(request): Json<EnvironmentConfigRequest>,
) -> Response {
    let config = ComputeEnvironmentConfig {
        id: next_config_id("env"),
        environment: request.environment,
        scopes: request.scopes.unwrap_or_else(default_scope_rules),
    };
    match store.insert_environment_config(config) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn list_environments<S: ComputeConfigStore>(State(store): State<Arc<S>>) -> Response {
    match store.environment_configs() {
        Ok(configs) => Json(configs).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn get_environment<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.environment_config(&ConfigId(id)) {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

async fn update_environment<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Json(request): Json<EnvironmentConfigRequest>,
) -> Response {
    let config = ComputeEnvironmentConfig {
        id: ConfigId(id),
        environment: request.environment,
        scopes: request.scopes.unwrap_or_else(default_scope_rules),
    };
    match store.update_environment_config(config.clone()) {
        Ok(()) => Json(config).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn delete_environment<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response {
    match store.delete_environment_config(&ConfigId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTemplateRequest {
    pub compute_spec_config_id: ConfigId,
    pub hardware_config_id: ConfigId,
    #[serde(default)]
    pub context: ExecutionContext,
}

async fn job_template_available<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Json(request): Json<JobTemplateRequest>,
) -> Response {
    let resolver = JobTemplateResolver::new(store);
    match resolver.is_available(
        &request.context,
        &request.compute_spec_config_id,
        &request.hardware_config_id,
    ) {
        Ok(available) => Json(json!({ "available": available })).into_response(),
        Err(error) => resolve_error_response(error),
    }
}

async fn job_template_resolve<S: ComputeConfigStore>(
    State(store): State<Arc<S>>,
    Json(request): Json<JobTemplateRequest>,
) -> Response {
    let resolver = JobTemplateResolver::new(store);
    match resolver.resolve(
        &request.context,
        &request.compute_spec_config_id,
        &request.hardware_config_id,
    ) {
        Ok(template) => Json(template).into_response(),
        Err(error) => resolve_error_response(error),
    }
}
