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

use crate::compute::domain::ConfigId;
use crate::compute::repository::{next_config_id, ComputeConfigStore, StoreError};
use crate::compute::router::{resolve_error_response, store_error_response};
use crate::compute::scope::{default_scope_rules, ExecutionContext, ScopeRules};

use super::domain::{Dashboard, DashboardConfig, DashboardFramework, LaunchSettings};
use super::repository::DashboardStore;
use super::resolver::DashboardJobTemplateResolver;

/// Shared state for the dashboard routes: dashboards plus the compute-side
/// store the bound environment and hardware live in.
pub struct DashboardState<C, D> {
    pub compute: Arc<C>,
    pub dashboards: Arc<D>,
}

impl<C, D> Clone for DashboardState<C, D> {
    fn clone(&self) -> Self {
        Self {
            compute: Arc::clone(&self.compute),
            dashboards: Arc::clone(&self.dashboards),
        }
    }
}

/// Router exposing dashboard config and framework administration plus the
/// dashboard job-template resolution operations.
pub fn dashboard_router<C, D>(compute: Arc<C>, dashboards: Arc<D>) -> Router
where
    C: ComputeConfigStore + 'static,
    D: DashboardStore + 'static,
{
    let state = DashboardState {
        compute,
        dashboards,
    };
    Router::new()
        .route(
            "/api/v1/dashboards/configs",
            post(create_config::<C, D>).get(list_configs::<C, D>),
        )
        .route(
            "/api/v1/dashboards/configs/:id",
            get(get_config::<C, D>)
                .put(update_config::<C, D>)
                .delete(delete_config::<C, D>),
        )
        .route(
            "/api/v1/dashboards/frameworks",
            post(create_framework::<C, D>).get(list_frameworks::<C, D>),
        )
        .route(
            "/api/v1/dashboards/frameworks/:name",
            get(get_framework::<C, D>)
                .put(update_framework::<C, D>)
                .delete(delete_framework::<C, D>),
        )
        .route(
            "/api/v1/dashboards/job-templates/available",
            post(dashboard_available::<C, D>),
        )
        .route(
            "/api/v1/dashboards/job-templates/resolve",
            post(dashboard_resolve::<C, D>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfigRequest {
    pub dashboard: Dashboard,
    #[serde(default)]
    pub scopes: Option<ScopeRules>,
    pub environment_config_id: ConfigId,
    pub hardware_config_id: ConfigId,
}

impl DashboardConfigRequest {
    fn into_config(self, id: ConfigId) -> DashboardConfig {
        DashboardConfig {
            id,
            dashboard: self.dashboard,
            scopes: self.scopes.unwrap_or_else(default_scope_rules),
            environment_config_id: self.environment_config_id,
            hardware_config_id: self.hardware_config_id,
        }
    }
}

/// The binding is fixed at creation, so both bound configs must exist then.
fn binding_error<C: ComputeConfigStore>(
    compute: &C,
    request: &DashboardConfigRequest,
) -> Result<Option<Response>, StoreError> {
    if compute
        .environment_config(&request.environment_config_id)?
        .is_none()
    {
        let body = json!({
            "error": format!(
                "bound environment config {} does not exist",
                request.environment_config_id
            )
        });
        return Ok(Some((StatusCode::BAD_REQUEST, Json(body)).into_response()));
    }
    if compute
        .hardware_config(&request.hardware_config_id)?
        .is_none()
    {
        let body = json!({
            "error": format!(
                "bound hardware config {} does not exist",
                request.hardware_config_id
            )
        });
        return Ok(Some((StatusCode::BAD_REQUEST, Json(body)).into_response()));
    }
    Ok(None)
}

async fn create_config<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Json(request): Json<DashboardConfigRequest>,
) -> Response {
    match binding_error(state.compute.as_ref(), &request) {
        Ok(Some(response)) => return response,
        Ok(None) => {}
        Err(error) => return store_error_response(error),
    }
    let config = request.into_config(next_config_id("dashboard"));
    match state.dashboards.insert_dashboard_config(config) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn list_configs<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
) -> Response {
    match state.dashboards.dashboard_configs() {
        Ok(configs) => Json(configs).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn get_config<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Path(id): Path<String>,
) -> Response {
    match state.dashboards.dashboard_config(&ConfigId(id)) {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

async fn update_config<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Path(id): Path<String>,
    Json(request): Json<DashboardConfigRequest>,
) -> Response {
    match binding_error(state.compute.as_ref(), &request) {
        Ok(Some(response)) => return response,
        Ok(None) => {}
        Err(error) => return store_error_response(error),
    }
    let config = request.into_config(ConfigId(id));
    match state.dashboards.update_dashboard_config(config.clone()) {
        Ok(()) => Json(config).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn delete_config<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Path(id): Path<String>,
) -> Response {
    match state.dashboards.delete_dashboard_config(&ConfigId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn create_framework<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Json(framework): Json<DashboardFramework>,
) -> Response {
    match state.dashboards.insert_framework(framework) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn list_frameworks<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
) -> Response {
    match state.dashboards.frameworks() {
        Ok(frameworks) => Json(frameworks).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn get_framework<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Path(name): Path<String>,
) -> Response {
    match state.dashboards.framework(&name) {
        Ok(Some(framework)) => Json(framework).into_response(),
        Ok(None) => store_error_response(StoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkUpdateRequest {
    pub command_template: String,
}

async fn update_framework<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Path(name): Path<String>,
    Json(request): Json<FrameworkUpdateRequest>,
) -> Response {
    let framework = DashboardFramework {
        name,
        command_template: request.command_template,
    };
    match state.dashboards.update_framework(framework.clone()) {
        Ok(()) => Json(framework).into_response(),
        Err(error) => store_error_response(error),
    }
}

async fn delete_framework<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Path(name): Path<String>,
) -> Response {
    match state.dashboards.delete_framework(&name) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTemplateRequest {
    pub dashboard_config_id: ConfigId,
    pub environment_config_id: ConfigId,
    pub hardware_config_id: ConfigId,
    #[serde(default)]
    pub context: ExecutionContext,
    #[serde(default)]
    pub launch: Option<LaunchSettings>,
}

async fn dashboard_available<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Json(request): Json<DashboardTemplateRequest>,
) -> Response {
    let resolver = DashboardJobTemplateResolver::new(state.compute, state.dashboards);
    match resolver.is_available(
        &request.context,
        &request.dashboard_config_id,
        &request.environment_config_id,
        &request.hardware_config_id,
    ) {
        Ok(available) => Json(json!({ "available": available })).into_response(),
        Err(error) => resolve_error_response(error),
    }
}

async fn dashboard_resolve<C: ComputeConfigStore, D: DashboardStore>(
    State(state): State<DashboardState<C, D>>,
    Json(request): Json<DashboardTemplateRequest>,
) -> Response {
    let Some(launch) = request.launch else {
        let body = json!({ "error": "launch settings are required to resolve a dashboard" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };
    let resolver = DashboardJobTemplateResolver::new(state.compute, state.dashboards);
    match resolver.resolve(
        &request.context,
        &request.dashboard_config_id,
        &request.environment_config_id,
        &request.hardware_config_id,
        &launch,
    ) {
        Ok(template) => Json(template).into_response(),
        Err(error) => resolve_error_response(error),
    }
}
