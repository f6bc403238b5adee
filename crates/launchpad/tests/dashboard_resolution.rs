//! Integration coverage for dashboard configuration and dashboard
//! job-template resolution, including command substitution, through the
//! public crate surface and the HTTP router.

mod common {
    use std::sync::Arc;

    use launchpad::compute::{
        ComputeConfigStore, ComputeEnvironment, ComputeEnvironmentConfig, ConfigId,
        ExecutionContext, Hardware, HardwareConfig, InMemoryComputeConfigStore, Scope, ScopeRule,
        ScopeRules,
    };
    use launchpad::dashboards::{
        install_default_frameworks, Dashboard, DashboardConfig, DashboardStore,
        InMemoryDashboardStore, LaunchSettings,
    };

    pub(super) fn context(site: Option<&str>, project: Option<&str>) -> ExecutionContext {
        ExecutionContext::new(
            site.map(str::to_string),
            project.map(str::to_string),
            None,
        )
    }

    pub(super) fn site_wide() -> ScopeRules {
        [ScopeRule::enabled_for_all(Scope::Site)]
            .into_iter()
            .map(|rule| (rule.scope, rule))
            .collect()
    }

    pub(super) fn launch() -> LaunchSettings {
        LaunchSettings {
            port: 8888,
            origin_host: "hub.example.org".to_string(),
            base_url: "/user/rkm/session-7".to_string(),
        }
    }

    pub(super) fn qc_dashboard() -> Dashboard {
        Dashboard {
            name: "qc-review".to_string(),
            description: "Session QC review board".to_string(),
            framework: Some("Streamlit".to_string()),
            command: None,
            file_source: "git".to_string(),
            git_repo_url: "https://git.example.org/qc/dashboards.git".to_string(),
            git_repo_branch: "main".to_string(),
            main_file_path: "qc/app.py".to_string(),
        }
    }

    pub(super) struct Stores {
        pub compute: Arc<InMemoryComputeConfigStore>,
        pub dashboards: Arc<InMemoryDashboardStore>,
    }

    pub(super) fn environment_config(id: &str) -> ComputeEnvironmentConfig {
        ComputeEnvironmentConfig {
            id: ConfigId::from(id),
            environment: ComputeEnvironment {
                name: id.to_string(),
                image: "launchpad/dashboard-base:latest".to_string(),
                command: None,
                environment_variables: Vec::new(),
                mounts: Vec::new(),
            },
            scopes: site_wide(),
        }
    }

    /// Environment `env-std`, hardware `hw-viz` and `hw-batch`, the default
    /// framework catalog, and one dashboard bound to (env-std, hw-viz)
    /// restricted to project `neuro-lab`.
    pub(super) fn seeded_stores() -> Stores {
        let compute = Arc::new(InMemoryComputeConfigStore::new());
        compute
            .insert_environment_config(environment_config("env-std"))
            .expect("environment inserts");
        for name in ["hw-viz", "hw-batch"] {
            compute
                .insert_hardware_config(HardwareConfig {
                    id: ConfigId::from(name),
                    hardware: Hardware {
                        name: name.to_string(),
                        cpu_limit: Some(2.0),
                        cpu_reservation: Some(1.0),
                        memory_limit: Some("4G".to_string()),
                        memory_reservation: Some("2G".to_string()),
                        constraints: Vec::new(),
                        environment_variables: Vec::new(),
                        generic_resources: Vec::new(),
                    },
                    scopes: site_wide(),
                })
                .expect("hardware inserts");
        }

        let dashboards = Arc::new(InMemoryDashboardStore::new());
        install_default_frameworks(dashboards.as_ref());
        let mut scopes = site_wide();
        let project_rule = ScopeRule::restricted_to(Scope::Project, ["neuro-lab"]);
        scopes.insert(project_rule.scope, project_rule);
        dashboards
            .insert_dashboard_config(DashboardConfig {
                id: ConfigId::from("dash-qc"),
                dashboard: qc_dashboard(),
                scopes,
                environment_config_id: ConfigId::from("env-std"),
                hardware_config_id: ConfigId::from("hw-viz"),
            })
            .expect("dashboard inserts");

        Stores {
            compute,
            dashboards,
        }
    }
}

mod resolution {
    use super::common::*;
    use launchpad::compute::{ComputeConfigStore, ConfigId, ResolveError};
    use launchpad::dashboards::DashboardJobTemplateResolver;

    #[test]
    fn resolved_command_is_fully_substituted() {
        let stores = seeded_stores();
        let resolver = DashboardJobTemplateResolver::new(stores.compute, stores.dashboards);

        let template = resolver
            .resolve(
                &context(Some("central"), Some("neuro-lab")),
                &ConfigId::from("dash-qc"),
                &ConfigId::from("env-std"),
                &ConfigId::from("hw-viz"),
                &launch(),
            )
            .expect("template resolves");

        assert!(template.command.starts_with("jhsingle-native-proxy"));
        assert!(template
            .command
            .contains("--repo https://git.example.org/qc/dashboards.git"));
        assert!(template
            .command
            .contains("streamlit run /home/jovyan/dashboards/qc/app.py"));
        assert!(template.command.contains("--server.port 8888"));
        assert!(!template.command.contains('{'));
    }

    #[test]
    fn unbound_hardware_is_a_denial() {
        let stores = seeded_stores();
        let resolver = DashboardJobTemplateResolver::new(stores.compute, stores.dashboards);

        let result = resolver.resolve(
            &context(Some("central"), Some("neuro-lab")),
            &ConfigId::from("dash-qc"),
            &ConfigId::from("env-std"),
            &ConfigId::from("hw-batch"),
            &launch(),
        );
        assert!(matches!(result, Err(ResolveError::Unavailable(_))));
    }

    #[test]
    fn unbound_environment_is_a_denial() {
        let stores = seeded_stores();
        // A second visible environment the dashboard is not bound to.
        stores
            .compute
            .insert_environment_config(environment_config("env-extra"))
            .expect("environment inserts");
        let resolver = DashboardJobTemplateResolver::new(stores.compute, stores.dashboards);

        let result = resolver.resolve(
            &context(Some("central"), Some("neuro-lab")),
            &ConfigId::from("dash-qc"),
            &ConfigId::from("env-extra"),
            &ConfigId::from("hw-viz"),
            &launch(),
        );
        assert!(matches!(result, Err(ResolveError::Unavailable(_))));
    }

    #[test]
    fn outside_project_is_a_denial() {
        let stores = seeded_stores();
        let resolver = DashboardJobTemplateResolver::new(stores.compute, stores.dashboards);

        let result = resolver.resolve(
            &context(Some("central"), Some("imaging-core")),
            &ConfigId::from("dash-qc"),
            &ConfigId::from("env-std"),
            &ConfigId::from("hw-viz"),
            &launch(),
        );
        assert!(matches!(result, Err(ResolveError::Unavailable(_))));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use launchpad::dashboards::dashboard_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let stores = seeded_stores();
        dashboard_router(stores.compute, stores.dashboards)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn default_framework_catalog_is_listed() {
        let response = build_router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/dashboards/frameworks")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let names: Vec<&str> = payload
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|framework| framework.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["Dash", "Panel", "Streamlit", "Voila"]);
    }

    #[tokio::test]
    async fn creating_a_config_with_a_dangling_binding_is_rejected() {
        let response = build_router()
            .oneshot(post(
                "/api/v1/dashboards/configs",
                json!({
                    "dashboard": qc_dashboard(),
                    "environmentConfigId": "env-gone",
                    "hardwareConfigId": "hw-viz"
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn availability_endpoint_reports_the_verdict() {
        let response = build_router()
            .oneshot(post(
                "/api/v1/dashboards/job-templates/available",
                json!({
                    "dashboardConfigId": "dash-qc",
                    "environmentConfigId": "env-std",
                    "hardwareConfigId": "hw-viz",
                    "context": { "site": "central", "project": "neuro-lab" }
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload, json!({ "available": true }));
    }

    #[tokio::test]
    async fn resolve_without_launch_settings_is_a_bad_request() {
        let response = build_router()
            .oneshot(post(
                "/api/v1/dashboards/job-templates/resolve",
                json!({
                    "dashboardConfigId": "dash-qc",
                    "environmentConfigId": "env-std",
                    "hardwareConfigId": "hw-viz",
                    "context": { "site": "central", "project": "neuro-lab" }
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn resolve_endpoint_returns_the_command() {
        let response = build_router()
            .oneshot(post(
                "/api/v1/dashboards/job-templates/resolve",
                json!({
                    "dashboardConfigId": "dash-qc",
                    "environmentConfigId": "env-std",
                    "hardwareConfigId": "hw-viz",
                    "context": { "site": "central", "project": "neuro-lab" },
                    "launch": {
                        "port": 8888,
                        "originHost": "hub.example.org",
                        "baseUrl": "/user/rkm/session-7"
                    }
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let command = payload
            .get("command")
            .and_then(Value::as_str)
            .expect("command present");
        assert!(command.contains("--server.port 8888"));
        assert!(!command.contains('{'));
    }

    #[tokio::test]
    async fn resolve_outside_the_allowed_project_maps_to_forbidden() {
        let response = build_router()
            .oneshot(post(
                "/api/v1/dashboards/job-templates/resolve",
                json!({
                    "dashboardConfigId": "dash-qc",
                    "environmentConfigId": "env-std",
                    "hardwareConfigId": "hw-viz",
                    "context": { "site": "central", "project": "imaging-core" },
                    "launch": {
                        "port": 8888,
                        "originHost": "hub.example.org",
                        "baseUrl": "/user/rkm/session-7"
                    }
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
