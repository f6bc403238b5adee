use std::sync::Arc;

use crate::compute::domain::{
    ComputeSpec, ComputeSpecConfig, ConfigId, Constraint, ConstraintConfig, ConstraintOperator,
    Hardware, HardwareConfig, HardwareOptions,
};
use crate::compute::repository::{ComputeConfigStore, InMemoryComputeConfigStore};
use crate::compute::scope::{ExecutionContext, ScopeRule, ScopeRules};

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

pub(super) fn compute_spec(name: &str) -> ComputeSpec {
    ComputeSpec {
        name: name.to_string(),
        image: "launchpad/datascience-notebook:latest".to_string(),
        command: Some("start-notebook.sh".to_string()),
        environment_variables: Vec::new(),
        mounts: Vec::new(),
    }
}

pub(super) fn hardware(name: &str) -> Hardware {
    Hardware {
        name: name.to_string(),
        cpu_limit: Some(4.0),
        cpu_reservation: Some(2.0),
        memory_limit: Some("8G".to_string()),
        memory_reservation: Some("4G".to_string()),
        constraints: Vec::new(),
        environment_variables: Vec::new(),
        generic_resources: Vec::new(),
    }
}

pub(super) fn spec_config(
    id: &str,
    scopes: ScopeRules,
    hardware_options: HardwareOptions,
) -> ComputeSpecConfig {
    ComputeSpecConfig {
        id: ConfigId::from(id),
        compute_spec: compute_spec(id),
        scopes,
        hardware_options,
    }
}

pub(super) fn hardware_config(id: &str, scopes: ScopeRules) -> HardwareConfig {
    HardwareConfig {
        id: ConfigId::from(id),
        hardware: hardware(id),
        scopes,
    }
}

pub(super) fn constraint_config(id: &str, key: &str, scopes: ScopeRules) -> ConstraintConfig {
    ConstraintConfig {
        id: ConfigId::from(id),
        constraint: Constraint {
            key: key.to_string(),
            operator: ConstraintOperator::In,
            values: ["worker".to_string()].into_iter().collect(),
        },
        scopes,
    }
}

pub(super) fn store_with(
    specs: Vec<ComputeSpecConfig>,
    hardware: Vec<HardwareConfig>,
    constraints: Vec<ConstraintConfig>,
) -> Arc<InMemoryComputeConfigStore> {
    let store = InMemoryComputeConfigStore::new();
    for config in specs {
        store
            .insert_compute_spec_config(config)
            .expect("spec config inserts");
    }
    for config in hardware {
        store
            .insert_hardware_config(config)
            .expect("hardware config inserts");
    }
    for config in constraints {
        store
            .insert_constraint_config(config)
            .expect("constraint config inserts");
    }
    Arc::new(store)
}
