use std::sync::Arc;

use crate::compute::domain::{
    ComputeEnvironment, ComputeEnvironmentConfig, ConfigId, Hardware, HardwareConfig,
};
use crate::compute::repository::{ComputeConfigStore, InMemoryComputeConfigStore};
use crate::compute::scope::{ExecutionContext, Scope, ScopeRule, ScopeRules};
use crate::dashboards::domain::{Dashboard, DashboardConfig, LaunchSettings};
use crate::dashboards::repository::{DashboardStore, InMemoryDashboardStore};
use crate::dashboards::resolver::DashboardJobTemplateResolver;

pub(super) fn ctx(
    site: Option<&str>,
    project: Option<&str>,
    user: Option<&str>,
) -> ExecutionContext {
    ExecutionContext::new(
        site.map(str::to_string),
        project.map(str::to_string),
        user.map(str::to_string),
    )
}

pub(super) fn rules<I>(entries: I) -> ScopeRules
where
    I: IntoIterator<Item = ScopeRule>,
{
    entries.into_iter().map(|rule| (rule.scope, rule)).collect()
}

pub(super) fn site_wide() -> ScopeRules {
    rules([ScopeRule::enabled_for_all(Scope::Site)])
}

pub(super) fn launch_settings() -> LaunchSettings {
    LaunchSettings {
        port: 8888,
        origin_host: "launchpad.example.org".to_string(),
        base_url: "/workspaces/user/session-1".to_string(),
    }
}

pub(super) fn streamlit_dashboard() -> Dashboard {
    Dashboard {
        name: "qc-review".to_string(),
        description: "Session QC review board".to_string(),
        framework: Some("Streamlit".to_string()),
        command: None,
        file_source: "git".to_string(),
        git_repo_url: "https://git.example.org/qc/dashboards.git".to_string(),
        git_repo_branch: "main".to_string(),
        main_file_path: "qc/app.py".to_string(),
    }
}

pub(super) fn custom_dashboard(command: Option<&str>) -> Dashboard {
    Dashboard {
        name: "bespoke".to_string(),
        description: String::new(),
        framework: Some("custom".to_string()),
        command: command.map(str::to_string),
        file_source: "git".to_string(),
        git_repo_url: "https://git.example.org/qc/bespoke.git".to_string(),
        git_repo_branch: "main".to_string(),
        main_file_path: "app.py".to_string(),
    }
}

pub(super) fn environment_config(id: &str, scopes: ScopeRules) -> ComputeEnvironmentConfig {
    ComputeEnvironmentConfig {
        id: ConfigId::from(id),
        environment: ComputeEnvironment {
            name: id.to_string(),
            image: "launchpad/dashboard-base:latest".to_string(),
            command: None,
            environment_variables: Vec::new(),
            mounts: Vec::new(),
        },
        scopes,
    }
}

pub(super) fn hardware_config(id: &str, scopes: ScopeRules) -> HardwareConfig {
    HardwareConfig {
        id: ConfigId::from(id),
        hardware: Hardware {
            name: id.to_string(),
            cpu_limit: Some(2.0),
            cpu_reservation: Some(1.0),
            memory_limit: Some("4G".to_string()),
            memory_reservation: Some("2G".to_string()),
            constraints: Vec::new(),
            environment_variables: Vec::new(),
            generic_resources: Vec::new(),
        },
        scopes,
    }
}

pub(super) fn dashboard_config(
    id: &str,
    dashboard: Dashboard,
    scopes: ScopeRules,
    environment_id: &str,
    hardware_id: &str,
) -> DashboardConfig {
    DashboardConfig {
        id: ConfigId::from(id),
        dashboard,
        scopes,
        environment_config_id: ConfigId::from(environment_id),
        hardware_config_id: ConfigId::from(hardware_id),
    }
}

pub(super) struct Fixture {
    pub compute: Arc<InMemoryComputeConfigStore>,
    pub dashboards: Arc<InMemoryDashboardStore>,
}

impl Fixture {
    pub fn resolver(
        &self,
    ) -> DashboardJobTemplateResolver<InMemoryComputeConfigStore, InMemoryDashboardStore> {
        DashboardJobTemplateResolver::new(
            Arc::clone(&self.compute),
            Arc::clone(&self.dashboards),
        )
    }
}

/// One dashboard bound to (env-1, hw-1), everything site-wide, the default
/// framework catalog installed.
pub(super) fn fixture(dashboard: DashboardConfig) -> Fixture {
    let compute = Arc::new(InMemoryComputeConfigStore::new());
    compute
        .insert_environment_config(environment_config("env-1", site_wide()))
        .expect("environment inserts");
    compute
        .insert_hardware_config(hardware_config("hw-1", site_wide()))
        .expect("hardware inserts");
    compute
        .insert_hardware_config(hardware_config("hw-2", site_wide()))
        .expect("hardware inserts");

    let dashboards = Arc::new(InMemoryDashboardStore::new());
    crate::dashboards::frameworks::install_default_frameworks(dashboards.as_ref());
    dashboards
        .insert_dashboard_config(dashboard)
        .expect("dashboard inserts");

    Fixture {
        compute,
        dashboards,
    }
}
