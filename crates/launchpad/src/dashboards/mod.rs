//! Dashboard definitions and the dashboard variant of template resolution:
//! strict 1:1 environment/hardware binding plus launch-command substitution.

pub mod domain;
pub mod frameworks;
pub mod repository;
pub mod resolver;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    Dashboard, DashboardConfig, DashboardFramework, DashboardJobTemplate, LaunchSettings,
};
pub use frameworks::{default_frameworks, install_default_frameworks, CommandError};
pub use repository::{DashboardStore, InMemoryDashboardStore};
pub use resolver::DashboardJobTemplateResolver;
pub use router::dashboard_router;
