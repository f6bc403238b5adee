use crate::infra::{build_stores, seed_sample_catalog};
use clap::Args;
use launchpad::compute::{ConfigId, ExecutionContext, JobTemplateResolver};
use launchpad::dashboards::{
    Dashboard, DashboardConfig, DashboardJobTemplateResolver, DashboardStore, LaunchSettings,
};
use launchpad::compute::{
    default_scope_rules, ComputeConfigStore, ComputeEnvironment, ComputeEnvironmentConfig,
};
use launchpad::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Site identifier for the demo context
    #[arg(long, default_value = "central")]
    pub(crate) site: String,
    /// Project identifier for the demo context
    #[arg(long, default_value = "neuro-lab")]
    pub(crate) project: String,
    /// User identifier for the demo context
    #[arg(long, default_value = "demo-user")]
    pub(crate) user: String,
    /// Skip the dashboard portion of the demo.
    #[arg(long)]
    pub(crate) skip_dashboard: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        site,
        project,
        user,
        skip_dashboard,
    } = args;

    let stores = build_stores();
    seed_sample_catalog(stores.compute.as_ref())?;

    let context = ExecutionContext::new(Some(site), Some(project), Some(user));
    println!("Launchpad resolution demo");
    println!(
        "- context: site={} project={} user={}",
        context.site.as_deref().unwrap_or("-"),
        context.project.as_deref().unwrap_or("-"),
        context.user.as_deref().unwrap_or("-")
    );

    let resolver = JobTemplateResolver::new(stores.compute.clone());
    for hardware_id in ["hw-standard", "hw-gpu"] {
        let available = resolver.is_available(
            &context,
            &ConfigId::from("spec-notebook"),
            &ConfigId::from(hardware_id),
        )?;
        println!("- spec-notebook on {hardware_id}: available={available}");
    }

    let template = resolver.resolve(
        &context,
        &ConfigId::from("spec-notebook"),
        &ConfigId::from("hw-standard"),
    )?;
    match serde_json::to_string_pretty(&template) {
        Ok(json) => println!("Resolved job template:\n{json}"),
        Err(err) => println!("Resolved job template unavailable: {err}"),
    }

    if skip_dashboard {
        return Ok(());
    }

    stores.compute.insert_environment_config(ComputeEnvironmentConfig {
        id: ConfigId::from("env-dashboard"),
        environment: ComputeEnvironment {
            name: "dashboard-base".to_string(),
            image: "launchpad/dashboard-base:latest".to_string(),
            command: None,
            environment_variables: Vec::new(),
            mounts: Vec::new(),
        },
        scopes: default_scope_rules(),
    })?;
    stores.dashboards.insert_dashboard_config(DashboardConfig {
        id: ConfigId::from("dash-qc"),
        dashboard: Dashboard {
            name: "qc-review".to_string(),
            description: "Session QC review board".to_string(),
            framework: Some("Streamlit".to_string()),
            command: None,
            file_source: "git".to_string(),
            git_repo_url: "https://git.example.org/qc/dashboards.git".to_string(),
            git_repo_branch: "main".to_string(),
            main_file_path: "qc/app.py".to_string(),
        },
        scopes: default_scope_rules(),
        environment_config_id: ConfigId::from("env-dashboard"),
        hardware_config_id: ConfigId::from("hw-standard"),
    })?;

    let dashboard_resolver =
        DashboardJobTemplateResolver::new(stores.compute.clone(), stores.dashboards.clone());
    let template = dashboard_resolver.resolve(
        &context,
        &ConfigId::from("dash-qc"),
        &ConfigId::from("env-dashboard"),
        &ConfigId::from("hw-standard"),
        &LaunchSettings {
            port: 8888,
            origin_host: "hub.example.org".to_string(),
            base_url: "/user/demo-user/session-1".to_string(),
        },
    )?;
    println!("\nDashboard launch command:\n{}", template.command);

    Ok(())
}
