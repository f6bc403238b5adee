use std::sync::Arc;

use tracing::debug;

use super::domain::{ConfigId, Constraint, JobTemplate};
use super::repository::{ComputeConfigStore, StoreError};
use super::scope::{self, ExecutionContext};

/// Error raised by template resolution. Availability checks only ever
/// surface the `Store` variant; policy denial and missing configs come back
/// as `Ok(false)` there and harden into errors only at `resolve` time.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: ConfigId },
    #[error("not available: {0}")]
    Unavailable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves a compute spec config and a hardware config into a runnable job
/// template for a given execution context.
///
/// Stateless: every call is a pure function of its inputs plus a
/// point-in-time read of the backing store, so concurrent resolutions need
/// no coordination.
pub struct JobTemplateResolver<S> {
    store: Arc<S>,
}

impl<S> JobTemplateResolver<S>
where
    S: ComputeConfigStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Whether the compute spec config and hardware config are both visible
    /// under the context and the hardware is permitted by the spec's pairing
    /// policy. A missing id is an unavailable result, not an error.
    pub fn is_available(
        &self,
        context: &ExecutionContext,
        compute_spec_config_id: &ConfigId,
        hardware_config_id: &ConfigId,
    ) -> Result<bool, ResolveError> {
        let Some(spec) = self.store.compute_spec_config(compute_spec_config_id)? else {
            return Ok(false);
        };
        let Some(hardware) = self.store.hardware_config(hardware_config_id)? else {
            return Ok(false);
        };

        if !scope::is_available(&spec.scopes, context) {
            debug!(%compute_spec_config_id, "compute spec config not visible under context");
            return Ok(false);
        }
        if !scope::is_available(&hardware.scopes, context) {
            debug!(%hardware_config_id, "hardware config not visible under context");
            return Ok(false);
        }
        if !spec.hardware_options.permits(hardware_config_id) {
            debug!(
                %compute_spec_config_id,
                %hardware_config_id,
                "hardware config not permitted by pairing policy"
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// Compose the job template for the given pair. Re-validates
    /// availability internally and fails with [`ResolveError::Unavailable`]
    /// rather than handing out a template the context may not see.
    pub fn resolve(
        &self,
        context: &ExecutionContext,
        compute_spec_config_id: &ConfigId,
        hardware_config_id: &ConfigId,
    ) -> Result<JobTemplate, ResolveError> {
        let spec = self
            .store
            .compute_spec_config(compute_spec_config_id)?
            .ok_or_else(|| ResolveError::NotFound {
                kind: "compute spec config",
                id: compute_spec_config_id.clone(),
            })?;
        let hardware = self
            .store
            .hardware_config(hardware_config_id)?
            .ok_or_else(|| ResolveError::NotFound {
                kind: "hardware config",
                id: hardware_config_id.clone(),
            })?;

        if !self.is_available(context, compute_spec_config_id, hardware_config_id)? {
            return Err(ResolveError::Unavailable(format!(
                "compute spec config {compute_spec_config_id} with hardware config \
                 {hardware_config_id} is not available to this context"
            )));
        }

        let constraints = available_constraints(self.store.as_ref(), context)?;

        Ok(JobTemplate {
            compute_spec: spec.compute_spec,
            hardware: hardware.hardware,
            constraints,
        })
    }
}

/// Every constraint payload visible under the context, in the store's
/// stable id order. Constraints carry no pairing policy of their own.
pub(crate) fn available_constraints<S>(
    store: &S,
    context: &ExecutionContext,
) -> Result<Vec<Constraint>, ResolveError>
where
    S: ComputeConfigStore,
{
    Ok(store
        .constraint_configs()?
        .into_iter()
        .filter(|config| scope::is_available(&config.scopes, context))
        .map(|config| config.constraint)
        .collect())
}
