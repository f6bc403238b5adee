use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::scope::ScopeRules;

/// Identifier wrapper shared by every administrator-managed configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigId(pub String);

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConfigId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Key/value pair injected into a container's environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    pub value: String,
}

/// Bind mount presented to the launched container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mount {
    pub volume_name: String,
    pub local_path: String,
    pub container_path: String,
    pub read_only: bool,
}

/// Named generic resource reservation (GPUs and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResource {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintOperator {
    In,
    NotIn,
}

/// Placement constraint restricting which nodes may run a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub key: String,
    pub operator: ConstraintOperator,
    pub values: BTreeSet<String>,
}

impl Constraint {
    /// Render as scheduler constraint strings, e.g. `["zone==east", "zone==west"]`.
    pub fn to_args(&self) -> Vec<String> {
        let operator = match self.operator {
            ConstraintOperator::In => "==",
            ConstraintOperator::NotIn => "!=",
        };
        self.values
            .iter()
            .map(|value| format!("{}{}{}", self.key, operator, value))
            .collect()
    }
}

/// What actually runs: image, command, environment, and mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeSpec {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub mounts: Vec<Mount>,
}

/// Container environment a dashboard runs inside. Same shape as a compute
/// spec; kept distinct because the two are configured and paired
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvironment {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub mounts: Vec<Mount>,
}

/// Hardware reservation profile applied to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub generic_resources: Vec<GenericResource>,
}

/// Pairing policy attached to a compute spec config: which hardware configs
/// it may be combined with.
///
/// Deliberately not a [`super::scope::ScopeRule`]: visibility is a
/// conjunction across scope levels, pairing is a single binary decision per
/// primary resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareOptions {
    pub allow_all_hardware: bool,
    #[serde(default)]
    pub hardware_configs: BTreeSet<ConfigId>,
}

impl HardwareOptions {
    /// All hardware is permitted regardless of the allow-set's contents.
    pub fn allow_all() -> Self {
        Self {
            allow_all_hardware: true,
            hardware_configs: BTreeSet::new(),
        }
    }

    /// Only the listed hardware config ids are permitted.
    pub fn allow_only<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ConfigId>,
    {
        Self {
            allow_all_hardware: false,
            hardware_configs: ids.into_iter().collect(),
        }
    }

    /// Whether the given hardware config may be paired with the owner.
    /// Compared by identifier; an allow-set entry whose id no longer
    /// resolves simply never matches.
    pub fn permits(&self, hardware_config_id: &ConfigId) -> bool {
        self.allow_all_hardware || self.hardware_configs.contains(hardware_config_id)
    }
}

/// Administrator-managed compute specification with its visibility rules and
/// hardware pairing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeSpecConfig {
    pub id: ConfigId,
    pub compute_spec: ComputeSpec,
    #[serde(default)]
    pub scopes: ScopeRules,
    pub hardware_options: HardwareOptions,
}

/// Administrator-managed hardware profile with its visibility rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareConfig {
    pub id: ConfigId,
    pub hardware: Hardware,
    #[serde(default)]
    pub scopes: ScopeRules,
}

/// Administrator-managed placement constraint with its visibility rules.
/// Constraints carry no pairing policy; every constraint visible under a
/// context is included in the resolved template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintConfig {
    pub id: ConfigId,
    pub constraint: Constraint,
    #[serde(default)]
    pub scopes: ScopeRules,
}

/// Administrator-managed compute environment with its visibility rules.
/// Dashboards bind to exactly one of these at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeEnvironmentConfig {
    pub id: ConfigId,
    pub environment: ComputeEnvironment,
    #[serde(default)]
    pub scopes: ScopeRules,
}

/// The resolved output of the plain template resolver. Pure value object
/// with no identity of its own; returned to the caller, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTemplate {
    pub compute_spec: ComputeSpec,
    pub hardware: Hardware,
    pub constraints: Vec<Constraint>,
}
