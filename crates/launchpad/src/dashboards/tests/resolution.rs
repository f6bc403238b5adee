use super::common::*;
use crate::compute::domain::ConfigId;
use crate::compute::resolver::ResolveError;
use crate::dashboards::repository::DashboardStore;

#[test]
fn resolves_the_full_dashboard_template() {
    let fixture = fixture(dashboard_config(
        "dash-1",
        streamlit_dashboard(),
        site_wide(),
        "env-1",
        "hw-1",
    ));
    let resolver = fixture.resolver();

    let template = resolver
        .resolve(
            &ctx(Some("S1"), None, None),
            &ConfigId::from("dash-1"),
            &ConfigId::from("env-1"),
            &ConfigId::from("hw-1"),
            &launch_settings(),
        )
        .expect("template resolves");

    assert_eq!(template.dashboard.name, "qc-review");
    assert_eq!(template.environment.name, "env-1");
    assert_eq!(template.hardware.name, "hw-1");
    assert!(template.command.starts_with("jhsingle-native-proxy"));
    assert!(template
        .command
        .contains("--repo https://git.example.org/qc/dashboards.git"));
    assert!(template.command.contains("--server.port 8888"));
    assert!(
        !template.command.contains('{'),
        "all placeholders substituted"
    );
}

#[test]
fn resolve_fails_with_unavailable_when_pairing_does_not_match() {
    let fixture = fixture(dashboard_config(
        "dash-1",
        streamlit_dashboard(),
        site_wide(),
        "env-1",
        "hw-1",
    ));
    let resolver = fixture.resolver();

    let result = resolver.resolve(
        &ctx(Some("S1"), None, None),
        &ConfigId::from("dash-1"),
        &ConfigId::from("env-1"),
        &ConfigId::from("hw-2"),
        &launch_settings(),
    );

    assert!(matches!(result, Err(ResolveError::Unavailable(_))));
}

#[test]
fn resolve_fails_with_not_found_for_a_missing_dashboard() {
    let fixture = fixture(dashboard_config(
        "dash-1",
        streamlit_dashboard(),
        site_wide(),
        "env-1",
        "hw-1",
    ));
    let resolver = fixture.resolver();

    let result = resolver.resolve(
        &ctx(None, None, None),
        &ConfigId::from("dash-gone"),
        &ConfigId::from("env-1"),
        &ConfigId::from("hw-1"),
        &launch_settings(),
    );

    match result {
        Err(ResolveError::NotFound { kind, .. }) => assert_eq!(kind, "dashboard config"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn unknown_framework_surfaces_as_not_found() {
    let mut dashboard = streamlit_dashboard();
    dashboard.framework = Some("Gradio".to_string());
    let fixture = fixture(dashboard_config(
        "dash-1",
        dashboard,
        site_wide(),
        "env-1",
        "hw-1",
    ));
    let resolver = fixture.resolver();

    let result = resolver.resolve(
        &ctx(Some("S1"), None, None),
        &ConfigId::from("dash-1"),
        &ConfigId::from("env-1"),
        &ConfigId::from("hw-1"),
        &launch_settings(),
    );

    match result {
        Err(ResolveError::NotFound { kind, id }) => {
            assert_eq!(kind, "dashboard framework");
            assert_eq!(id, ConfigId::from("Gradio"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn broken_framework_template_is_an_invalid_configuration() {
    let fixture = fixture(dashboard_config(
        "dash-1",
        streamlit_dashboard(),
        site_wide(),
        "env-1",
        "hw-1",
    ));
    // An administrator edits the template and leaves a typo placeholder.
    fixture
        .dashboards
        .update_framework(crate::dashboards::domain::DashboardFramework {
            name: "Streamlit".to_string(),
            command_template: "run {mainFile}".to_string(),
        })
        .expect("framework updates");
    let resolver = fixture.resolver();

    let result = resolver.resolve(
        &ctx(Some("S1"), None, None),
        &ConfigId::from("dash-1"),
        &ConfigId::from("env-1"),
        &ConfigId::from("hw-1"),
        &launch_settings(),
    );

    assert!(matches!(result, Err(ResolveError::InvalidConfiguration(_))));
}

#[test]
fn dashboard_resolution_is_deterministic() {
    let fixture = fixture(dashboard_config(
        "dash-1",
        streamlit_dashboard(),
        site_wide(),
        "env-1",
        "hw-1",
    ));
    let resolver = fixture.resolver();
    let context = ctx(Some("S1"), Some("P1"), Some("U1"));

    let first = resolver
        .resolve(
            &context,
            &ConfigId::from("dash-1"),
            &ConfigId::from("env-1"),
            &ConfigId::from("hw-1"),
            &launch_settings(),
        )
        .expect("template resolves");
    let second = resolver
        .resolve(
            &context,
            &ConfigId::from("dash-1"),
            &ConfigId::from("env-1"),
            &ConfigId::from("hw-1"),
            &launch_settings(),
        )
        .expect("template resolves");

    assert_eq!(first, second);
}
