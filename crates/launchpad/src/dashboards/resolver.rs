use std::sync::Arc;

use tracing::debug;

use crate::compute::domain::ConfigId;
use crate::compute::repository::ComputeConfigStore;
use crate::compute::resolver::{available_constraints, ResolveError};
use crate::compute::scope::{self, ExecutionContext};

use super::domain::{DashboardConfig, DashboardJobTemplate, LaunchSettings};
use super::frameworks;
use super::repository::DashboardStore;

/// Resolves a dashboard config, its bound compute environment, and its
/// bound hardware into a runnable dashboard job template.
///
/// A dashboard carries no hardware allow-set; it is bound 1:1 to one
/// environment config and one hardware config at creation time, so the
/// pairing check is id equality rather than set membership. The dashboard,
/// the bound environment, and the bound hardware must each independently
/// pass scope evaluation for the context.
pub struct DashboardJobTemplateResolver<C, D> {
    compute: Arc<C>,
    dashboards: Arc<D>,
}

impl<C, D> DashboardJobTemplateResolver<C, D>
where
    C: ComputeConfigStore,
    D: DashboardStore,
{
    pub fn new(compute: Arc<C>, dashboards: Arc<D>) -> Self {
        Self {
            compute,
            dashboards,
        }
    }

    /// Whether the dashboard may be launched on the given environment and
    /// hardware under the context. A missing id is an unavailable result,
    /// not an error.
    pub fn is_available(
        &self,
        context: &ExecutionContext,
        dashboard_config_id: &ConfigId,
        environment_config_id: &ConfigId,
        hardware_config_id: &ConfigId,
    ) -> Result<bool, ResolveError> {
        let Some(dashboard) = self.dashboards.dashboard_config(dashboard_config_id)? else {
            return Ok(false);
        };

        if !scope::is_available(&dashboard.scopes, context) {
            debug!(%dashboard_config_id, "dashboard config not visible under context");
            return Ok(false);
        }

        // Strict 1:1 binding fixed at creation time.
        if dashboard.environment_config_id != *environment_config_id
            || dashboard.hardware_config_id != *hardware_config_id
        {
            debug!(
                %dashboard_config_id,
                %environment_config_id,
                %hardware_config_id,
                "ids do not match the dashboard's bound environment/hardware"
            );
            return Ok(false);
        }

        let Some(environment) = self.compute.environment_config(environment_config_id)? else {
            return Ok(false);
        };
        if !scope::is_available(&environment.scopes, context) {
            debug!(%environment_config_id, "environment config not visible under context");
            return Ok(false);
        }

        let Some(hardware) = self.compute.hardware_config(hardware_config_id)? else {
            return Ok(false);
        };
        if !scope::is_available(&hardware.scopes, context) {
            debug!(%hardware_config_id, "hardware config not visible under context");
            return Ok(false);
        }

        Ok(true)
    }

    /// Compose the dashboard job template, including the fully substituted
    /// launch command. Re-validates availability internally and fails with
    /// [`ResolveError::Unavailable`] on denial.
    pub fn resolve(
        &self,
        context: &ExecutionContext,
        dashboard_config_id: &ConfigId,
        environment_config_id: &ConfigId,
        hardware_config_id: &ConfigId,
        launch: &LaunchSettings,
    ) -> Result<DashboardJobTemplate, ResolveError> {
        let dashboard_config = self
            .dashboards
            .dashboard_config(dashboard_config_id)?
            .ok_or_else(|| ResolveError::NotFound {
                kind: "dashboard config",
                id: dashboard_config_id.clone(),
            })?;
        let environment_config = self
            .compute
            .environment_config(environment_config_id)?
            .ok_or_else(|| ResolveError::NotFound {
                kind: "compute environment config",
                id: environment_config_id.clone(),
            })?;
        let hardware_config = self
            .compute
            .hardware_config(hardware_config_id)?
            .ok_or_else(|| ResolveError::NotFound {
                kind: "hardware config",
                id: hardware_config_id.clone(),
            })?;

        if !self.is_available(
            context,
            dashboard_config_id,
            environment_config_id,
            hardware_config_id,
        )? {
            return Err(ResolveError::Unavailable(format!(
                "dashboard config {dashboard_config_id} with environment config \
                 {environment_config_id} and hardware config {hardware_config_id} \
                 is not available to this context"
            )));
        }

        let command = self.resolve_command(&dashboard_config, launch)?;
        let constraints = available_constraints(self.compute.as_ref(), context)?;

        Ok(DashboardJobTemplate {
            dashboard: dashboard_config.dashboard,
            environment: environment_config.environment,
            hardware: hardware_config.hardware,
            constraints,
            command,
        })
    }

    fn resolve_command(
        &self,
        config: &DashboardConfig,
        launch: &LaunchSettings,
    ) -> Result<String, ResolveError> {
        let framework = match config.dashboard.framework.as_deref() {
            Some(name) if !name.trim().is_empty() && !name.eq_ignore_ascii_case("custom") => {
                self.dashboards.framework(name)?
            }
            _ => None,
        };

        frameworks::resolve_command(&config.dashboard, framework.as_ref(), launch)
            .map_err(ResolveError::from)
    }
}
