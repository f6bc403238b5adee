use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::domain::{
    ComputeEnvironmentConfig, ComputeSpecConfig, ConfigId, ConstraintConfig, HardwareConfig,
};

static CONFIG_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Mint a fresh configuration id, e.g. `hw-000004`.
pub fn next_config_id(prefix: &str) -> ConfigId {
    let id = CONFIG_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ConfigId(format!("{prefix}-{id:06}"))
}

/// Error enumeration for configuration store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("config already exists")]
    Conflict,
    #[error("config not found")]
    NotFound,
    #[error("config store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the compute-side configuration objects. The
/// resolution engine only reads; the mutating operations back the
/// administrative HTTP surface.
pub trait ComputeConfigStore: Send + Sync {
    fn insert_compute_spec_config(
        &self,
        config: ComputeSpecConfig,
    ) -> Result<ComputeSpecConfig, StoreError>;
    fn update_compute_spec_config(&self, config: ComputeSpecConfig) -> Result<(), StoreError>;
    fn compute_spec_config(&self, id: &ConfigId)
        -> Result<Option<ComputeSpecConfig>, StoreError>;
    fn compute_spec_configs(&self) -> Result<Vec<ComputeSpecConfig>, StoreError>;
    fn delete_compute_spec_config(&self, id: &ConfigId) -> Result<(), StoreError>;

    fn insert_hardware_config(
        &self,
        config: HardwareConfig,
    ) -> Result<HardwareConfig, StoreError>;
    fn update_hardware_config(&self, config: HardwareConfig) -> Result<(), StoreError>;
    fn hardware_config(&self, id: &ConfigId) -> Result<Option<HardwareConfig>, StoreError>;
    fn hardware_configs(&self) -> Result<Vec<HardwareConfig>, StoreError>;
    /// Deleting a hardware config also removes it from every compute-spec
    /// pairing allow-set that references it.
    fn delete_hardware_config(&self, id: &ConfigId) -> Result<(), StoreError>;

    fn insert_constraint_config(
        &self,
        config: ConstraintConfig,
    ) -> Result<ConstraintConfig, StoreError>;
    fn update_constraint_config(&self, config: ConstraintConfig) -> Result<(), StoreError>;
    fn constraint_config(&self, id: &ConfigId) -> Result<Option<ConstraintConfig>, StoreError>;
    fn constraint_configs(&self) -> Result<Vec<ConstraintConfig>, StoreError>;
    fn delete_constraint_config(&self, id: &ConfigId) -> Result<(), StoreError>;

    fn insert_environment_config(
        &self,
        config: ComputeEnvironmentConfig,
    ) -> Result<ComputeEnvironmentConfig, StoreError>;
    fn update_environment_config(
        &self,
        config: ComputeEnvironmentConfig,
    ) -> Result<(), StoreError>;
    fn environment_config(
        &self,
        id: &ConfigId,
    ) -> Result<Option<ComputeEnvironmentConfig>, StoreError>;
    fn environment_configs(&self) -> Result<Vec<ComputeEnvironmentConfig>, StoreError>;
    fn delete_environment_config(&self, id: &ConfigId) -> Result<(), StoreError>;
}

#[derive(Default)]
struct ComputeTables {
    compute_specs: BTreeMap<ConfigId, ComputeSpecConfig>,
    hardware: BTreeMap<ConfigId, HardwareConfig>,
    constraints: BTreeMap<ConfigId, ConstraintConfig>,
    environments: BTreeMap<ConfigId, ComputeEnvironmentConfig>,
}

/// In-memory store used by the API service, the demo command, and tests.
/// Listings come back in id order so repeated resolution is deterministic.
#[derive(Default, Clone)]
pub struct InMemoryComputeConfigStore {
    tables: Arc<Mutex<ComputeTables>>,
}

impl InMemoryComputeConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, ComputeTables> {
        self.tables.lock().expect("compute store mutex poisoned")
    }
}

fn insert_into<T: Clone>(
    table: &mut BTreeMap<ConfigId, T>,
    id: ConfigId,
    config: T,
) -> Result<T, StoreError> {
    if table.contains_key(&id) {
        return Err(StoreError::Conflict);
    }
    table.insert(id, config.clone());
    Ok(config)
}

fn update_in<T>(table: &mut BTreeMap<ConfigId, T>, id: ConfigId, config: T) -> Result<(), StoreError> {
    if !table.contains_key(&id) {
        return Err(StoreError::NotFound);
    }
    table.insert(id, config);
    Ok(())
}

fn delete_from<T>(table: &mut BTreeMap<ConfigId, T>, id: &ConfigId) -> Result<(), StoreError> {
    table.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
}

impl ComputeConfigStore for InMemoryComputeConfigStore {
    fn insert_compute_spec_config(
        &self,
        config: ComputeSpecConfig,
    ) -> Result<ComputeSpecConfig, StoreError> {
        insert_into(&mut self.tables().compute_specs, config.id.clone(), config)
    }

    fn update_compute_spec_config(&self, config: ComputeSpecConfig) -> Result<(), StoreError> {
        update_in(&mut self.tables().compute_specs, config.id.clone(), config)
    }

    fn compute_spec_config(
        &self,
        id: &ConfigId,
    ) -> Result<Option<ComputeSpecConfig>, StoreError> {
        Ok(self.tables().compute_specs.get(id).cloned())
    }

    fn compute_spec_configs(&self) -> Result<Vec<ComputeSpecConfig>, StoreError> {
        Ok(self.tables().compute_specs.values().cloned().collect())
    }

    fn delete_compute_spec_config(&self, id: &ConfigId) -> Result<(), StoreError> {
        delete_from(&mut self.tables().compute_specs, id)
    }

    fn insert_hardware_config(
        &self,
        config: HardwareConfig,
    ) -> Result<HardwareConfig, StoreError> {
        insert_into(&mut self.tables().hardware, config.id.clone(), config)
    }

    fn update_hardware_config(&self, config: HardwareConfig) -> Result<(), StoreError> {
        update_in(&mut self.tables().hardware, config.id.clone(), config)
    }

    fn hardware_config(&self, id: &ConfigId) -> Result<Option<HardwareConfig>, StoreError> {
        Ok(self.tables().hardware.get(id).cloned())
    }

    fn hardware_configs(&self) -> Result<Vec<HardwareConfig>, StoreError> {
        Ok(self.tables().hardware.values().cloned().collect())
    }

    fn delete_hardware_config(&self, id: &ConfigId) -> Result<(), StoreError> {
        let mut tables = self.tables();
        delete_from(&mut tables.hardware, id)?;
        // Referential cleanup: drop the id from every pairing allow-set.
        for spec in tables.compute_specs.values_mut() {
            spec.hardware_options.hardware_configs.remove(id);
        }
        Ok(())
    }

    fn insert_constraint_config(
        &self,
        config: ConstraintConfig,
    ) -> Result<ConstraintConfig, StoreError> {
        insert_into(&mut self.tables().constraints, config.id.clone(), config)
    }

    fn update_constraint_config(&self, config: ConstraintConfig) -> Result<(), StoreError> {
        update_in(&mut self.tables().constraints, config.id.clone(), config)
    }

    fn constraint_config(&self, id: &ConfigId) -> Result<Option<ConstraintConfig>, StoreError> {
        Ok(self.tables().constraints.get(id).cloned())
    }

    fn constraint_configs(&self) -> Result<Vec<ConstraintConfig>, StoreError> {
        Ok(self.tables().constraints.values().cloned().collect())
    }

    fn delete_constraint_config(&self, id: &ConfigId) -> Result<(), StoreError> {
        delete_from(&mut self.tables().constraints, id)
    }

    fn insert_environment_config(
        &self,
        config: ComputeEnvironmentConfig,
    ) -> Result<ComputeEnvironmentConfig, StoreError> {
        insert_into(&mut self.tables().environments, config.id.clone(), config)
    }

    fn update_environment_config(
        &self,
        config: ComputeEnvironmentConfig,
    ) -> Result<(), StoreError> {
        update_in(&mut self.tables().environments, config.id.clone(), config)
    }

    fn environment_config(
        &self,
        id: &ConfigId,
    ) -> Result<Option<ComputeEnvironmentConfig>, StoreError> {
        Ok(self.tables().environments.get(id).cloned())
    }

    fn environment_configs(&self) -> Result<Vec<ComputeEnvironmentConfig>, StoreError> {
        Ok(self.tables().environments.values().cloned().collect())
    }

    fn delete_environment_config(&self, id: &ConfigId) -> Result<(), StoreError> {
        delete_from(&mut self.tables().environments, id)
    }
}
