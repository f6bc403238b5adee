//! Compute-side configuration model and the plain job-template resolution
//! engine: scope rules, execution contexts, hardware pairing, and template
//! composition.

pub mod domain;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod scope;

#[cfg(test)]
mod tests;

pub use domain::{
    ComputeEnvironment, ComputeEnvironmentConfig, ComputeSpec, ComputeSpecConfig, ConfigId,
    Constraint, ConstraintConfig, ConstraintOperator, EnvironmentVariable, GenericResource,
    Hardware, HardwareConfig, HardwareOptions, JobTemplate, Mount,
};
pub use repository::{next_config_id, ComputeConfigStore, InMemoryComputeConfigStore, StoreError};
pub use resolver::{JobTemplateResolver, ResolveError};
pub use router::compute_router;
pub use scope::{default_scope_rules, is_available, ExecutionContext, Scope, ScopeRule, ScopeRules};
