use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::create::{create_deployment, should_wait};
use super::error::{is_single_char_environment, DeployError, Violations};
use super::poll::{poll_deployments, PollBudget, BATCH_POLL_INTERVAL};
use super::query::{get_deployments, DeploymentFilter, DeploymentQuery, FilterPredicate};
use super::request::{format_deployment_date, CreateDeploymentOptions};
use crate::api::models::{Deployment, DeploymentState};
use crate::api::RestClient;

/// Runtimes an install never redeploys
pub const INSTALL_RUNTIME_BLACKLIST: [&str; 2] = ["Kubernetes", "Kube_helm"];

/// Asks the user to approve a batch before anything is created
pub trait Confirm: Send + Sync {
    fn ask_yes_no(&self, message: &str) -> bool;
}

/// Which final states count as a successful promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessPolicy {
    /// Every deployment must end in `success`
    Strict,
    /// `rejected` deployments are accepted next to `success`
    #[default]
    AllowRejected,
}

impl SuccessPolicy {
    pub fn accepts(&self, state: DeploymentState) -> bool {
        match self {
            SuccessPolicy::Strict => state == DeploymentState::Success,
            SuccessPolicy::AllowRejected => {
                matches!(state, DeploymentState::Success | DeploymentState::Rejected)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromoteOptions {
    pub environment: String,
    pub from_environment: String,
    pub deployment_date: Option<String>,
    pub execute_shakedown_test: bool,
    pub wait: bool,
    pub max_wait: Duration,
    /// Restricts the source query to these app servers
    pub whitelist_app_servers: Vec<String>,
    pub blacklist_app_servers: Vec<String>,
    pub blacklist_runtimes: Vec<String>,
    /// Skip the confirmation prompt
    pub silent: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub environment: String,
    pub from_environment: String,
    pub deployment_date: Option<String>,
    pub execute_shakedown_test: bool,
    pub wait: bool,
    pub max_wait: Duration,
    /// File with one app server name per line to leave out
    pub blacklist_file: Option<PathBuf>,
}

/// Result of a promote or install run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionOutcome {
    /// Created deployments, or the final polled snapshot when `waited`
    pub deployments: Vec<Deployment>,
    /// The user declined; nothing was created
    pub declined: bool,
    pub waited: bool,
}

impl PromotionOutcome {
    /// Without a wait the created deployments are still pending and the
    /// run counts as successful
    pub fn succeeded(&self, policy: SuccessPolicy) -> bool {
        !self.waited || self.deployments.iter().all(|d| policy.accepts(d.state))
    }

    pub fn any_failed(&self) -> bool {
        self.deployments
            .iter()
            .any(|d| d.state == DeploymentState::Failed)
    }
}

/// Everything a batch run needs once the command specific inputs are resolved
struct BatchPlan<'a> {
    environment: &'a str,
    from_environment: &'a str,
    source_query: DeploymentQuery,
    blacklist_app_servers: Vec<String>,
    blacklist_runtimes: Vec<String>,
    confirm: bool,
    deployment_date: Option<&'a str>,
    execute_shakedown_test: bool,
    wait: bool,
    max_wait: Duration,
}

fn validate_environments(
    environment: &str,
    from_environment: &str,
    deployment_date: Option<&str>,
) -> Result<(), DeployError> {
    let mut violations = Violations::default();
    violations.check(is_single_char_environment(environment), || {
        format!("want environment with one char, got {}", environment)
    });
    violations.check(is_single_char_environment(from_environment), || {
        format!("want FromEnvironment with one char, got {}", from_environment)
    });
    if let Err(message) = format_deployment_date(deployment_date) {
        violations.push(message);
    }
    violations.into_result()
}

/// Replicate the latest successful deployments of one environment onto another
pub async fn promote_deployments(
    client: &dyn RestClient,
    confirm: &dyn Confirm,
    options: &PromoteOptions,
) -> Result<PromotionOutcome, DeployError> {
    validate_environments(
        &options.environment,
        &options.from_environment,
        options.deployment_date.as_deref(),
    )?;

    let source_filter = DeploymentFilter::latest_in_environment(&options.from_environment)
        .with_app_servers(trimmed_names(&options.whitelist_app_servers));

    let plan = BatchPlan {
        environment: &options.environment,
        from_environment: &options.from_environment,
        source_query: source_filter.into(),
        blacklist_app_servers: options.blacklist_app_servers.clone(),
        blacklist_runtimes: options.blacklist_runtimes.clone(),
        confirm: !options.silent,
        deployment_date: options.deployment_date.as_deref(),
        execute_shakedown_test: options.execute_shakedown_test,
        wait: options.wait,
        max_wait: options.max_wait,
    };

    run_batch(client, confirm, plan).await
}

/// Promote variant driven by a blacklist file; always asks for confirmation
pub async fn install_deployments(
    client: &dyn RestClient,
    confirm: &dyn Confirm,
    options: &InstallOptions,
) -> Result<PromotionOutcome, DeployError> {
    validate_environments(
        &options.environment,
        &options.from_environment,
        options.deployment_date.as_deref(),
    )?;

    let blacklist_app_servers = match &options.blacklist_file {
        Some(path) => read_blacklist(path)?,
        None => Vec::new(),
    };

    let plan = BatchPlan {
        environment: &options.environment,
        from_environment: &options.from_environment,
        source_query: DeploymentQuery::Expression(vec![
            FilterPredicate::eq("Environment", &options.from_environment),
            FilterPredicate::eq("Latest deployment job for App Server and Env", "true"),
        ]),
        blacklist_app_servers,
        blacklist_runtimes: INSTALL_RUNTIME_BLACKLIST
            .iter()
            .map(|runtime| runtime.to_string())
            .collect(),
        confirm: true,
        deployment_date: options.deployment_date.as_deref(),
        execute_shakedown_test: options.execute_shakedown_test,
        wait: options.wait,
        max_wait: options.max_wait,
    };

    run_batch(client, confirm, plan).await
}

/// One app server name per line; blank lines are ignored
pub fn read_blacklist(path: &Path) -> Result<Vec<String>, DeployError> {
    let content = std::fs::read_to_string(path).map_err(|source| DeployError::Blacklist {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Keep successful deployments not excluded by app server or runtime
pub fn select_promotable(
    deployments: Vec<Deployment>,
    blacklist_app_servers: &[String],
    blacklist_runtimes: &[String],
) -> Vec<Deployment> {
    deployments
        .into_iter()
        .filter(|d| d.state == DeploymentState::Success)
        .filter(|d| !contains_name(blacklist_app_servers, &d.app_server_name))
        .filter(|d| match &d.runtime_name {
            Some(runtime) => !contains_name(blacklist_runtimes, runtime),
            None => true,
        })
        .collect()
}

/// Names match ignoring surrounding whitespace
fn contains_name(names: &[String], name: &str) -> bool {
    names.iter().any(|candidate| candidate.trim() == name.trim())
}

fn trimmed_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

async fn run_batch(
    client: &dyn RestClient,
    confirm: &dyn Confirm,
    plan: BatchPlan<'_>,
) -> Result<PromotionOutcome, DeployError> {
    let snapshot = get_deployments(client, &plan.source_query).await?;
    if snapshot.is_empty() {
        return Err(DeployError::NoSourceDeployment {
            environment: plan.from_environment.to_string(),
        });
    }

    let total = snapshot.len();
    let selected = select_promotable(
        snapshot,
        &plan.blacklist_app_servers,
        &plan.blacklist_runtimes,
    );
    info!(
        "{} of {} deployment(s) from environment {} selected",
        selected.len(),
        total,
        plan.from_environment
    );

    if plan.confirm {
        let message = format!(
            "Do you really want to start the deployment of {} app-servers on environment: {}",
            selected.len(),
            plan.environment
        );
        if !confirm.ask_yes_no(&message) {
            info!("Deployment to environment {} aborted", plan.environment);
            return Ok(PromotionOutcome {
                declined: true,
                ..Default::default()
            });
        }
    }

    let mut created = Vec::with_capacity(selected.len());
    for source in &selected {
        let options = CreateDeploymentOptions {
            app_server: source.app_server_name.clone(),
            app_names: source
                .apps_with_version
                .iter()
                .map(|app| app.application_name.clone())
                .collect(),
            app_versions: source
                .apps_with_version
                .iter()
                .map(|app| app.version.clone())
                .collect(),
            environment: plan.environment.to_string(),
            release: source.release_name.clone(),
            deployment_date: plan.deployment_date.map(String::from),
            execute_shakedown_test: plan.execute_shakedown_test,
            ..Default::default()
        };

        match create_deployment(client, &options).await {
            Ok(deployment) => created.push(deployment),
            Err(err) => {
                warn!(
                    "Error creating deployment for app server {}: {}",
                    source.app_server_name, err
                );
                return Err(DeployError::PartialFailure {
                    app_server: source.app_server_name.clone(),
                    created,
                    source: Box::new(err),
                });
            }
        }
    }

    if created.is_empty() || !should_wait(plan.wait, plan.max_wait, BATCH_POLL_INTERVAL) {
        return Ok(PromotionOutcome {
            deployments: created,
            ..Default::default()
        });
    }

    let filter = DeploymentFilter::latest_in_environment(plan.environment).with_app_servers(
        created
            .iter()
            .map(|d| d.app_server_name.clone())
            .collect(),
    );
    let deployments = poll_deployments(client, filter, PollBudget::batch(plan.max_wait)).await?;

    Ok(PromotionOutcome {
        deployments,
        declined: false,
        waited: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::AppWithVersion;
    use crate::api::testing::{status_error, ScriptedClient};
    use reqwest::{Method, StatusCode};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Answer {
        yes: bool,
        asked: AtomicUsize,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Self {
                yes,
                asked: AtomicUsize::new(0),
            }
        }

        fn asked(&self) -> usize {
            self.asked.load(Ordering::SeqCst)
        }
    }

    impl Confirm for Answer {
        fn ask_yes_no(&self, _message: &str) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.yes
        }
    }

    fn deployment(app_server: &str, state: DeploymentState, runtime: Option<&str>) -> Deployment {
        Deployment {
            app_server_name: app_server.to_string(),
            state,
            runtime_name: runtime.map(String::from),
            apps_with_version: vec![AppWithVersion::new("app", "1.0")],
            ..Default::default()
        }
    }

    /// Source snapshot on GET, echo of the request on POST
    fn server(snapshot: serde_json::Value) -> ScriptedClient {
        ScriptedClient::new(move |request, previous| {
            if request.method == Method::POST {
                let body = request.body.clone().unwrap();
                return Ok(serde_json::json!({
                    "trackingId": 500 + previous,
                    "state": "requested",
                    "appServerName": body["appServerName"],
                    "environmentName": body["environmentName"],
                    "appsWithVersion": body["appsWithVersion"],
                    "releaseName": body["releaseName"],
                }));
            }
            Ok(snapshot.clone())
        })
    }

    fn promote_options() -> PromoteOptions {
        PromoteOptions {
            environment: "Y".to_string(),
            from_environment: "B".to_string(),
            max_wait: Duration::from_secs(600),
            silent: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_select_promotable() {
        let snapshot = vec![
            deployment("A", DeploymentState::Success, None),
            deployment("B", DeploymentState::Failed, None),
            deployment("C", DeploymentState::Success, Some("Kubernetes")),
        ];

        let selected = select_promotable(snapshot, &[], &["Kubernetes".to_string()]);

        let names: Vec<&str> = selected.iter().map(|d| d.app_server_name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_select_promotable_honours_app_server_blacklist() {
        let snapshot = vec![
            deployment("A", DeploymentState::Success, Some("EAP")),
            deployment("B", DeploymentState::Success, Some("EAP")),
        ];

        let selected = select_promotable(snapshot, &["B".to_string()], &[]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].app_server_name, "A");
    }

    #[test]
    fn test_success_policy() {
        let outcome = PromotionOutcome {
            deployments: vec![
                deployment("A", DeploymentState::Success, None),
                deployment("B", DeploymentState::Rejected, None),
            ],
            waited: true,
            ..Default::default()
        };
        assert!(outcome.succeeded(SuccessPolicy::AllowRejected));
        assert!(!outcome.succeeded(SuccessPolicy::Strict));
        assert!(!outcome.any_failed());
    }

    #[test]
    fn test_pending_deployments_without_wait_succeed() {
        let outcome = PromotionOutcome {
            deployments: vec![deployment("A", DeploymentState::Requested, None)],
            ..Default::default()
        };
        assert!(outcome.succeeded(SuccessPolicy::Strict));

        let waited = PromotionOutcome {
            waited: true,
            ..outcome
        };
        assert!(!waited.succeeded(SuccessPolicy::AllowRejected));
    }

    #[test]
    fn test_blacklists_ignore_surrounding_whitespace() {
        let snapshot = vec![
            deployment("A", DeploymentState::Success, None),
            deployment("B", DeploymentState::Success, None),
            deployment("C", DeploymentState::Success, Some("Kubernetes")),
        ];

        let selected = select_promotable(snapshot, &[" B".to_string()], &["Kubernetes ".to_string()]);

        let names: Vec<&str> = selected.iter().map(|d| d.app_server_name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[tokio::test]
    async fn test_promote_end_to_end() {
        let client = server(serde_json::json!([{
            "appServerName": "Test",
            "environmentName": "B",
            "state": "success",
            "appsWithVersion": [{"applicationName": "testapp", "version": "1.0"}]
        }]));
        let confirm = Answer::new(false);

        let outcome = promote_deployments(&client, &confirm, &promote_options())
            .await
            .unwrap();

        assert_eq!(confirm.asked(), 0);
        assert_eq!(outcome.deployments.len(), 1);
        let created = &outcome.deployments[0];
        assert_eq!(created.app_server_name, "Test");
        assert_eq!(created.environment_name, "Y");
        assert_eq!(
            created.apps_with_version,
            vec![AppWithVersion::new("testapp", "1.0")]
        );
        assert!(!outcome.waited);
        assert!(outcome.succeeded(SuccessPolicy::AllowRejected));

        let requests = client.requests();
        assert_eq!(
            requests[0].path,
            "resources/deployments?environmentName=B&onlyLatest=true"
        );
        assert_eq!(client.count(Method::POST, "resources/deployments"), 1);
    }

    #[tokio::test]
    async fn test_whitelist_restricts_source_query() {
        let client = server(serde_json::json!([
            {"appServerName": "aps_a", "state": "success",
             "appsWithVersion": [{"applicationName": "a", "version": "1"}]}
        ]));
        let options = PromoteOptions {
            whitelist_app_servers: vec![" aps_a".to_string()],
            execute_shakedown_test: true,
            ..promote_options()
        };

        promote_deployments(&client, &Answer::new(true), &options)
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(
            requests[0].path,
            "resources/deployments?appServerName=aps_a&environmentName=B&onlyLatest=true"
        );
        let body = requests[1].body.clone().unwrap();
        assert_eq!(body["executeShakedownTest"], true);
    }

    #[tokio::test]
    async fn test_empty_source_is_fatal() {
        let client = server(serde_json::json!([]));

        let err = promote_deployments(&client, &Answer::new(true), &promote_options())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::NoSourceDeployment { .. }));
        assert_eq!(
            err.to_string(),
            "There was an error on creating the deployment, no deployment found from environment: B"
        );
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_request() {
        let client = server(serde_json::json!([]));
        let options = PromoteOptions {
            environment: "YY".to_string(),
            from_environment: String::new(),
            ..promote_options()
        };

        let err = promote_deployments(&client, &Answer::new(true), &options)
            .await
            .unwrap_err();

        match err {
            DeployError::Validation(violations) => assert_eq!(violations.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_declined_confirmation_creates_nothing() {
        let client = server(serde_json::json!([
            {"appServerName": "aps_a", "state": "success",
             "appsWithVersion": [{"applicationName": "a", "version": "1"}]}
        ]));
        let confirm = Answer::new(false);
        let options = PromoteOptions {
            silent: false,
            ..promote_options()
        };

        let outcome = promote_deployments(&client, &confirm, &options)
            .await
            .unwrap();

        assert_eq!(confirm.asked(), 1);
        assert!(outcome.declined);
        assert!(outcome.deployments.is_empty());
        assert_eq!(client.count(Method::POST, "resources/deployments"), 0);
    }

    #[tokio::test]
    async fn test_failed_creation_keeps_created_deployments() {
        let client = ScriptedClient::new(|request, previous| {
            if request.method == Method::POST {
                if previous == 1 {
                    return Err(status_error(StatusCode::BAD_REQUEST, "no release"));
                }
                return Ok(serde_json::json!({
                    "trackingId": 1,
                    "appServerName": request.body.as_ref().unwrap()["appServerName"],
                }));
            }
            Ok(serde_json::json!([
                {"appServerName": "aps_a", "state": "success",
                 "appsWithVersion": [{"applicationName": "a", "version": "1"}]},
                {"appServerName": "aps_b", "state": "success",
                 "appsWithVersion": [{"applicationName": "b", "version": "1"}]},
                {"appServerName": "aps_c", "state": "success",
                 "appsWithVersion": [{"applicationName": "c", "version": "1"}]}
            ]))
        });

        let err = promote_deployments(&client, &Answer::new(true), &promote_options())
            .await
            .unwrap_err();

        match &err {
            DeployError::PartialFailure {
                app_server,
                created,
                source,
            } => {
                assert_eq!(app_server, "aps_b");
                assert_eq!(created.len(), 1);
                assert_eq!(created[0].app_server_name, "aps_a");
                assert!(matches!(**source, DeployError::Api(_)));
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
        assert_eq!(err.deployments().len(), 1);
        assert_eq!(client.count(Method::POST, "resources/deployments"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_replaces_result_with_polled_snapshot() {
        let client = ScriptedClient::new(|request, previous| {
            if request.method == Method::POST {
                return Ok(serde_json::json!({
                    "trackingId": 9,
                    "state": "requested",
                    "appServerName": request.body.as_ref().unwrap()["appServerName"],
                }));
            }
            if request.path.contains("environmentName=B") {
                return Ok(serde_json::json!([
                    {"appServerName": "aps_a", "state": "success",
                     "appsWithVersion": [{"applicationName": "a", "version": "1"}]}
                ]));
            }
            // the first GET was the source query
            let state = if previous < 2 { "progress" } else { "failed" };
            Ok(serde_json::json!([
                {"appServerName": "aps_a", "environmentName": "Y", "state": state}
            ]))
        });
        let options = PromoteOptions {
            wait: true,
            ..promote_options()
        };

        let outcome = promote_deployments(&client, &Answer::new(true), &options)
            .await
            .unwrap();

        assert!(outcome.waited);
        assert_eq!(outcome.deployments[0].state, DeploymentState::Failed);
        assert!(!outcome.succeeded(SuccessPolicy::AllowRejected));
        let polls: Vec<String> = client
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::GET && r.path.contains("environmentName=Y"))
            .map(|r| r.path)
            .collect();
        assert_eq!(polls.len(), 2);
        assert_eq!(
            polls[0],
            "resources/deployments?appServerName=aps_a&environmentName=Y&onlyLatest=true"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsettled_batch_times_out_with_snapshot() {
        let client = ScriptedClient::new(|request, _| {
            if request.method == Method::POST {
                return Ok(serde_json::json!({
                    "trackingId": 9,
                    "state": "requested",
                    "appServerName": request.body.as_ref().unwrap()["appServerName"],
                }));
            }
            if request.path.contains("environmentName=B") {
                return Ok(serde_json::json!([
                    {"appServerName": "aps_a", "state": "success",
                     "appsWithVersion": [{"applicationName": "a", "version": "1"}]}
                ]));
            }
            Ok(serde_json::json!([
                {"appServerName": "aps_a", "environmentName": "Y", "state": "progress"}
            ]))
        });
        let options = PromoteOptions {
            wait: true,
            max_wait: Duration::from_secs(120),
            ..promote_options()
        };

        let err = promote_deployments(&client, &Answer::new(true), &options)
            .await
            .unwrap_err();

        match &err {
            DeployError::Timeout { attempts, last } => {
                assert_eq!(*attempts, 2);
                assert_eq!(last.len(), 1);
                assert_eq!(last[0].state, DeploymentState::Progress);
                assert_eq!(last[0].environment_name, "Y");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(err.deployments().len(), 1);
        assert_eq!(client.count(Method::POST, "resources/deployments"), 1);
    }

    #[tokio::test]
    async fn test_wait_below_batch_interval_skips_polling() {
        let client = server(serde_json::json!([
            {"appServerName": "aps_a", "state": "success",
             "appsWithVersion": [{"applicationName": "a", "version": "1"}]}
        ]));
        let options = PromoteOptions {
            wait: true,
            max_wait: Duration::from_secs(60),
            ..promote_options()
        };

        let outcome = promote_deployments(&client, &Answer::new(true), &options)
            .await
            .unwrap();

        assert!(!outcome.waited);
        assert_eq!(client.count(Method::GET, "resources/deployments"), 1);
    }

    #[test]
    fn test_read_blacklist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "aps_a\n\n  aps_b  \n").unwrap();

        let blacklist = read_blacklist(file.path()).unwrap();
        assert_eq!(blacklist, vec!["aps_a", "aps_b"]);

        let err = read_blacklist(Path::new("/nonexistent/blacklist.txt")).unwrap_err();
        assert!(matches!(err, DeployError::Blacklist { .. }));
    }

    #[tokio::test]
    async fn test_install_uses_filter_expression_and_blacklists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "aps_skip").unwrap();

        let client = ScriptedClient::new(|request, _| {
            if request.method == Method::POST {
                return Ok(serde_json::json!({
                    "trackingId": 3,
                    "appServerName": request.body.as_ref().unwrap()["appServerName"],
                }));
            }
            Ok(serde_json::json!([
                {"appServerName": "aps_keep", "state": "success", "runtimeName": "EAP 7",
                 "appsWithVersion": [{"applicationName": "k", "version": "1"}]},
                {"appServerName": "aps_skip", "state": "success",
                 "appsWithVersion": [{"applicationName": "s", "version": "1"}]},
                {"appServerName": "aps_helm", "state": "success", "runtimeName": "Kube_helm",
                 "appsWithVersion": [{"applicationName": "h", "version": "1"}]}
            ]))
        });
        let confirm = Answer::new(true);
        let options = InstallOptions {
            environment: "Y".to_string(),
            from_environment: "B".to_string(),
            blacklist_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let outcome = install_deployments(&client, &confirm, &options)
            .await
            .unwrap();

        assert_eq!(confirm.asked(), 1);
        assert_eq!(outcome.deployments.len(), 1);
        assert_eq!(outcome.deployments[0].app_server_name, "aps_keep");

        let source = &client.requests()[0].path;
        assert!(source.starts_with("resources/deployments/filter?filters="));
        let decoded = urlencoding::decode(source.split_once('=').unwrap().1).unwrap();
        assert_eq!(
            decoded,
            r#"[{"name":"Environment","comp":"eq","val":"B"},{"name":"Latest deployment job for App Server and Env","comp":"eq","val":"true"}]"#
        );
    }
}
