use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::compute::domain::ConfigId;
use crate::compute::repository::StoreError;

use super::domain::{DashboardConfig, DashboardFramework};

/// Storage abstraction over dashboard configs and frameworks. Frameworks
/// are keyed by name; dashboards reference them by that name.
pub trait DashboardStore: Send + Sync {
    fn insert_dashboard_config(
        &self,
        config: DashboardConfig,
    ) -> Result<DashboardConfig, StoreError>;
    fn update_dashboard_config(&self, config: DashboardConfig) -> Result<(), StoreError>;
    fn dashboard_config(&self, id: &ConfigId) -> Result<Option<DashboardConfig>, StoreError>;
    fn dashboard_configs(&self) -> Result<Vec<DashboardConfig>, StoreError>;
    fn delete_dashboard_config(&self, id: &ConfigId) -> Result<(), StoreError>;

    fn insert_framework(
        &self,
        framework: DashboardFramework,
    ) -> Result<DashboardFramework, StoreError>;
    fn update_framework(&self, framework: DashboardFramework) -> Result<(), StoreError>;
    fn framework(&self, name: &str) -> Result<Option<DashboardFramework>, StoreError>;
    fn frameworks(&self) -> Result<Vec<DashboardFramework>, StoreError>;
    fn delete_framework(&self, name: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
struct DashboardTables {
    configs: BTreeMap<ConfigId, DashboardConfig>,
    frameworks: BTreeMap<String, DashboardFramework>,
}

/// In-memory store used by the API service, the demo command, and tests.
#[derive(Default, Clone)]
pub struct InMemoryDashboardStore {
    tables: Arc<Mutex<DashboardTables>>,
}

impl InMemoryDashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, DashboardTables> {
        self.tables.lock().expect("dashboard store mutex poisoned")
    }
}

impl DashboardStore for InMemoryDashboardStore {
    fn insert_dashboard_config(
        &self,
        config: DashboardConfig,
    ) -> Result<DashboardConfig, StoreError> {
        let mut tables = self.tables();
        if tables.configs.contains_key(&config.id) {
            return Err(StoreError::Conflict);
        }
        tables.configs.insert(config.id.clone(), config.clone());
        Ok(config)
    }

    fn update_dashboard_config(&self, config: DashboardConfig) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if !tables.configs.contains_key(&config.id) {
            return Err(StoreError::NotFound);
        }
        tables.configs.insert(config.id.clone(), config);
        Ok(())
    }

    fn dashboard_config(&self, id: &ConfigId) -> Result<Option<DashboardConfig>, StoreError> {
        Ok(self.tables().configs.get(id).cloned())
    }

    fn dashboard_configs(&self) -> Result<Vec<DashboardConfig>, StoreError> {
        Ok(self.tables().configs.values().cloned().collect())
    }

    fn delete_dashboard_config(&self, id: &ConfigId) -> Result<(), StoreError> {
        self.tables()
            .configs
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn insert_framework(
        &self,
        framework: DashboardFramework,
    ) -> Result<DashboardFramework, StoreError> {
        let mut tables = self.tables();
        if tables.frameworks.contains_key(&framework.name) {
            return Err(StoreError::Conflict);
        }
        tables
            .frameworks
            .insert(framework.name.clone(), framework.clone());
        Ok(framework)
    }

    fn update_framework(&self, framework: DashboardFramework) -> Result<(), StoreError> {
        let mut tables = self.tables();
        if !tables.frameworks.contains_key(&framework.name) {
            return Err(StoreError::NotFound);
        }
        tables.frameworks.insert(framework.name.clone(), framework);
        Ok(())
    }

    fn framework(&self, name: &str) -> Result<Option<DashboardFramework>, StoreError> {
        Ok(self.tables().frameworks.get(name).cloned())
    }

    fn frameworks(&self) -> Result<Vec<DashboardFramework>, StoreError> {
        Ok(self.tables().frameworks.values().cloned().collect())
    }

    fn delete_framework(&self, name: &str) -> Result<(), StoreError> {
        self.tables()
            .frameworks
            .remove(name)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
