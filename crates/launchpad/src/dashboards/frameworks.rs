use tracing::{error, info};

use crate::compute::domain::ConfigId;
use crate::compute::resolver::ResolveError;

use super::domain::{Dashboard, DashboardFramework, LaunchSettings};
use super::repository::DashboardStore;

/// Defect in administrator-entered command template data. Resolution fails
/// loudly on these; silently proceeding would launch a broken command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("dashboard framework '{0}' does not exist")]
    UnknownFramework(String),
    #[error("custom dashboard '{0}' has no command")]
    MissingCommand(String),
    #[error("command template placeholder '{{{0}}}' could not be resolved")]
    UnresolvedPlaceholder(String),
}

impl From<CommandError> for ResolveError {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::UnknownFramework(name) => ResolveError::NotFound {
                kind: "dashboard framework",
                id: ConfigId(name),
            },
            other => ResolveError::InvalidConfiguration(other.to_string()),
        }
    }
}

fn is_custom(framework_name: Option<&str>) -> bool {
    match framework_name {
        None => true,
        Some(name) => name.trim().is_empty() || name.eq_ignore_ascii_case("custom"),
    }
}

/// Produce the launch command for a dashboard.
///
/// A custom dashboard (no framework, or framework "custom") supplies its own
/// command as the template; otherwise the named framework's template is
/// used, and the caller must have looked it up. Substitution is literal
/// find/replace per placeholder; any brace left afterwards is a
/// configuration error.
pub fn resolve_command(
    dashboard: &Dashboard,
    framework: Option<&DashboardFramework>,
    launch: &LaunchSettings,
) -> Result<String, CommandError> {
    let template = if is_custom(dashboard.framework.as_deref()) {
        dashboard
            .command
            .as_deref()
            .ok_or_else(|| CommandError::MissingCommand(dashboard.name.clone()))?
    } else {
        match framework {
            Some(framework) => framework.command_template.as_str(),
            None => {
                let name = dashboard.framework.clone().unwrap_or_default();
                return Err(CommandError::UnknownFramework(name));
            }
        }
    };

    let command = template
        .replace("{repo}", &dashboard.git_repo_url)
        .replace("{repobranch}", &dashboard.git_repo_branch)
        .replace("{mainFilePath}", &dashboard.main_file_path)
        .replace("{port}", &launch.port.to_string())
        .replace("{origin_host}", &launch.origin_host)
        .replace("{base_url}", &launch.base_url)
        // Argument escape used by framework templates so the inner command's
        // flags survive the outer proxy's argument parsing.
        .replace("{--}", "--");

    if let Some(placeholder) = unresolved_placeholder(&command) {
        return Err(CommandError::UnresolvedPlaceholder(placeholder));
    }

    Ok(collapse_whitespace(&command))
}

/// First `{` span left in the command after substitution, if any. Every
/// known placeholder has been replaced by now, so any remaining brace is an
/// unresolved placeholder; that includes whitespace-bearing spans and an
/// unterminated `{`.
fn unresolved_placeholder(command: &str) -> Option<String> {
    let start = command.find('{')?;
    let tail = &command[start + 1..];
    let name = match tail.find('}') {
        Some(end) => &tail[..end],
        None => tail,
    };
    Some(name.trim().to_string())
}

/// Replace whitespace runs with a single space.
fn collapse_whitespace(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Built-in framework catalog, installed at startup.
pub fn default_frameworks() -> Vec<DashboardFramework> {
    vec![
        DashboardFramework {
            name: "Panel".to_string(),
            command_template: "jhsingle-native-proxy \
                --port 8888 \
                --destport 5006 \
                --repo {repo} \
                --repobranch {repobranch} \
                --repofolder /home/jovyan/dashboards \
                bokeh-root-cmd /home/jovyan/dashboards/{mainFilePath} \
                {--}port={port} \
                {--}allow-websocket-origin={origin_host} \
                {--}prefix={base_url} \
                {--}server=panel"
                .to_string(),
        },
        DashboardFramework {
            name: "Streamlit".to_string(),
            command_template: "jhsingle-native-proxy \
                --port 8888 \
                --destport 8501 \
                --repo {repo} \
                --repobranch {repobranch} \
                --repofolder /home/jovyan/dashboards \
                streamlit run /home/jovyan/dashboards/{mainFilePath} \
                {--}server.port {port} \
                {--}server.headless True \
                {--}server.fileWatcherType none"
                .to_string(),
        },
        DashboardFramework {
            name: "Voila".to_string(),
            command_template: "jhsingle-native-proxy \
                --port 8888 \
                --destport 0 \
                --repo {repo} \
                --repobranch {repobranch} \
                --repofolder /home/jovyan/dashboards \
                voila /home/jovyan/dashboards/{mainFilePath} \
                {--}port {port} \
                {--}no-browser \
                {--}Voila.base_url={base_url}/ \
                {--}Voila.server_url=/ \
                {--}Voila.ip=0.0.0.0 \
                {--}Voila.tornado_settings allow_origin={origin_host} \
                --progressive"
                .to_string(),
        },
        DashboardFramework {
            name: "Dash".to_string(),
            command_template: "jhsingle-native-proxy \
                --port=8888 \
                --destport=8050 \
                --repo={repo} \
                --repobranch={repobranch} \
                --repofolder=/home/jovyan/dashboards \
                plotlydash-tornado-cmd /home/jovyan/dashboards/{mainFilePath} \
                {--}port={port} \
                {--}ip 0.0.0.0"
                .to_string(),
        },
    ]
}

/// Seed the default framework catalog. Idempotent: frameworks that already
/// exist are left untouched, and an individual failure never blocks the
/// rest of the catalog.
pub fn install_default_frameworks<S>(store: &S)
where
    S: DashboardStore,
{
    for framework in default_frameworks() {
        match store.framework(&framework.name) {
            Ok(Some(_)) => {
                info!(name = %framework.name, "dashboard framework already exists, skipping");
            }
            Ok(None) => {
                if let Err(err) = store.insert_framework(framework.clone()) {
                    error!(name = %framework.name, %err, "failed to install dashboard framework");
                }
            }
            Err(err) => {
                error!(name = %framework.name, %err, "failed to check dashboard framework");
            }
        }
    }
}
