use serde::{Deserialize, Serialize};

use crate::compute::domain::{ComputeEnvironment, ConfigId, Constraint, Hardware};
use crate::compute::scope::ScopeRules;

/// A dashboard definition: what to serve and which framework serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Framework name, or absent/"custom" to use `command` directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Launch command template for custom dashboards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub file_source: String,
    #[serde(default)]
    pub git_repo_url: String,
    #[serde(default)]
    pub git_repo_branch: String,
    #[serde(default)]
    pub main_file_path: String,
}

/// A dashboard framework: a named, reusable launch command template with
/// placeholders the resolver substitutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFramework {
    pub name: String,
    pub command_template: String,
}

/// Administrator-managed dashboard with its visibility rules. Unlike a
/// compute spec config, a dashboard carries no hardware allow-set: it is
/// permanently bound, at creation time, to exactly one compute environment
/// config and one hardware config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub id: ConfigId,
    pub dashboard: Dashboard,
    #[serde(default)]
    pub scopes: ScopeRules,
    pub environment_config_id: ConfigId,
    pub hardware_config_id: ConfigId,
}

/// Per-request values substituted into a framework command template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSettings {
    pub port: u16,
    pub origin_host: String,
    pub base_url: String,
}

/// The resolved output of the dashboard template resolver: the plain triple
/// plus the dashboard payload and its fully substituted launch command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardJobTemplate {
    pub dashboard: Dashboard,
    pub environment: ComputeEnvironment,
    pub hardware: Hardware,
    pub constraints: Vec<Constraint>,
    pub command: String,
}
