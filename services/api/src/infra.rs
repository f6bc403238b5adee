use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use launchpad::compute::{
    ComputeConfigStore, ComputeSpec, ComputeSpecConfig, ConfigId, Constraint, ConstraintConfig,
    ConstraintOperator, Hardware, HardwareConfig, HardwareOptions, InMemoryComputeConfigStore,
    Scope, ScopeRule, ScopeRules, StoreError,
};
use launchpad::dashboards::{install_default_frameworks, InMemoryDashboardStore};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) struct Stores {
    pub(crate) compute: Arc<InMemoryComputeConfigStore>,
    pub(crate) dashboards: Arc<InMemoryDashboardStore>,
}

/// Empty stores with the built-in dashboard framework catalog installed.
pub(crate) fn build_stores() -> Stores {
    let compute = Arc::new(InMemoryComputeConfigStore::new());
    let dashboards = Arc::new(InMemoryDashboardStore::new());
    install_default_frameworks(dashboards.as_ref());
    Stores {
        compute,
        dashboards,
    }
}

fn rules<I>(entries: I) -> ScopeRules
where
    I: IntoIterator<Item = ScopeRule>,
{
    entries.into_iter().map(|rule| (rule.scope, rule)).collect()
}

/// Sample catalog used by the demo command: two hardware profiles, a
/// project-restricted notebook spec paired with the smaller one, and a
/// site-wide placement constraint.
pub(crate) fn seed_sample_catalog(store: &InMemoryComputeConfigStore) -> Result<(), StoreError> {
    store.insert_hardware_config(HardwareConfig {
        id: ConfigId::from("hw-standard"),
        hardware: Hardware {
            name: "standard".to_string(),
            cpu_limit: Some(4.0),
            cpu_reservation: Some(2.0),
            memory_limit: Some("8G".to_string()),
            memory_reservation: Some("4G".to_string()),
            constraints: Vec::new(),
            environment_variables: Vec::new(),
            generic_resources: Vec::new(),
        },
        scopes: rules([ScopeRule::enabled_for_all(Scope::Site)]),
    })?;
    store.insert_hardware_config(HardwareConfig {
        id: ConfigId::from("hw-gpu"),
        hardware: Hardware {
            name: "gpu".to_string(),
            cpu_limit: Some(8.0),
            cpu_reservation: Some(4.0),
            memory_limit: Some("32G".to_string()),
            memory_reservation: Some("16G".to_string()),
            constraints: Vec::new(),
            environment_variables: Vec::new(),
            generic_resources: Vec::new(),
        },
        scopes: rules([
            ScopeRule::enabled_for_all(Scope::Site),
            ScopeRule::restricted_to(Scope::Project, ["imaging-core"]),
        ]),
    })?;

    store.insert_compute_spec_config(ComputeSpecConfig {
        id: ConfigId::from("spec-notebook"),
        compute_spec: ComputeSpec {
            name: "notebook".to_string(),
            image: "launchpad/notebook:2024.1".to_string(),
            command: None,
            environment_variables: Vec::new(),
            mounts: Vec::new(),
        },
        scopes: rules([
            ScopeRule::enabled_for_all(Scope::Site),
            ScopeRule::restricted_to(Scope::Project, ["neuro-lab"]),
        ]),
        hardware_options: HardwareOptions::allow_only([ConfigId::from("hw-standard")]),
    })?;

    store.insert_constraint_config(ConstraintConfig {
        id: ConfigId::from("constraint-zone"),
        constraint: Constraint {
            key: "node.labels.zone".to_string(),
            operator: ConstraintOperator::In,
            values: ["east".to_string()].into_iter().collect(),
        },
        scopes: rules([ScopeRule::enabled_for_all(Scope::Site)]),
    })?;

    Ok(())
}
