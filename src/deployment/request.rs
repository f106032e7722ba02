use chrono::{Local, NaiveDateTime, TimeZone};
use std::time::Duration;
use tracing::info;

use super::error::{is_single_char_environment, DeployError, Violations};
use super::query::{get_deployments, DeploymentFilter, DeploymentQuery};
use crate::api::models::{AppWithVersion, DeploymentParameter, DeploymentRequest};
use crate::api::RestClient;

/// Accepted user input formats for the deployment date (local time)
const INPUT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%d.%m.%Y %H:%M"];

/// Date format the server expects
const LIIMA_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Options of a single deployment creation
#[derive(Debug, Clone, Default)]
pub struct CreateDeploymentOptions {
    pub app_server: String,
    pub app_names: Vec<String>,
    pub app_versions: Vec<String>,
    pub environment: String,
    pub release: Option<String>,
    /// `YYYY-MM-DD hh:mm` or `DD.MM.YYYY hh:mm`; absent means now
    pub deployment_date: Option<String>,
    pub execute_shakedown_test: bool,
    /// Deployment parameter keys, paired by index with `values`
    pub keys: Vec<String>,
    pub values: Vec<String>,
    pub send_email: bool,
    pub request_only: bool,
    pub simulate: bool,
    pub neighbourhood_test: bool,
    /// Wait until the deployment succeeded or failed
    pub wait: bool,
    pub max_wait: Duration,
    /// Copy applications and versions from the latest deployment of this environment
    pub from_environment: Option<String>,
}

impl CreateDeploymentOptions {
    fn source_environment(&self) -> Option<&str> {
        self.from_environment
            .as_deref()
            .filter(|env| !env.is_empty())
    }

    /// Check the options, reporting every violation in one error
    pub fn validate(&self) -> Result<(), DeployError> {
        let mut violations = Violations::default();

        violations.check(
            is_single_char_environment(&self.environment),
            || format!("want environment with one char, got {}", self.environment),
        );
        violations.check(self.keys.len() == self.values.len(), || {
            format!(
                "want same count of key and value, got key {} != value {}",
                self.keys.len(),
                self.values.len()
            )
        });

        match self.source_environment() {
            Some(from_environment) => {
                violations.check(is_single_char_environment(from_environment), || {
                    format!(
                        "want FromEnvironment with one char, got {}",
                        from_environment
                    )
                });
            }
            None => {
                violations.check(!self.app_server.is_empty(), || "want appServer".to_string());
                violations.check(!self.app_names.is_empty(), || "want appName".to_string());
                violations.check(!self.app_versions.is_empty(), || {
                    "want appVersion".to_string()
                });
                violations.check(self.app_names.len() == self.app_versions.len(), || {
                    format!(
                        "want same count of appName and appVersion, got appName {} != appVersion {}",
                        self.app_names.len(),
                        self.app_versions.len()
                    )
                });
            }
        }

        if let Err(message) = format_deployment_date(self.deployment_date.as_deref()) {
            violations.push(message);
        }

        violations.into_result()
    }

    fn parameters(&self) -> Vec<DeploymentParameter> {
        self.keys
            .iter()
            .zip(&self.values)
            .map(|(key, value)| DeploymentParameter {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    fn explicit_apps(&self) -> Vec<AppWithVersion> {
        self.app_names
            .iter()
            .zip(&self.app_versions)
            .map(|(name, version)| AppWithVersion::new(name.as_str(), version.as_str()))
            .collect()
    }
}

/// Render the user supplied date (or now) in the server's format
pub fn format_deployment_date(input: Option<&str>) -> Result<String, String> {
    let date = match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Local::now(),
        Some(raw) => {
            let naive = INPUT_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .ok_or_else(|| {
                    format!(
                        "want date as 'YYYY-MM-DD hh:mm' or 'DD.MM.YYYY hh:mm', got {}",
                        raw
                    )
                })?;
            Local
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| format!("date {} is ambiguous in the local time zone", raw))?
        }
    };
    Ok(date.format(LIIMA_DATE_FORMAT).to_string())
}

/// Assemble the creation payload for validated `options`.
///
/// With a source environment the applications are copied from the latest
/// deployment of the app server there; otherwise the explicit name and
/// version lists are zipped in order.
pub async fn build_request(
    client: &dyn RestClient,
    options: &CreateDeploymentOptions,
) -> Result<DeploymentRequest, DeployError> {
    let (app_server, apps) = match options.source_environment() {
        Some(from_environment) => {
            let mut filter = DeploymentFilter::latest_in_environment(from_environment);
            if !options.app_server.is_empty() {
                filter.app_servers = vec![options.app_server.clone()];
            }

            let deployments = get_deployments(client, &DeploymentQuery::from(filter)).await?;
            let source = deployments
                .into_iter()
                .next()
                .ok_or_else(|| DeployError::NoSourceDeployment {
                    environment: from_environment.to_string(),
                })?;

            info!(
                "Copying {} application(s) of {} from environment {}",
                source.apps_with_version.len(),
                source.app_server_name,
                from_environment
            );

            let app_server = if options.app_server.is_empty() {
                source.app_server_name
            } else {
                options.app_server.clone()
            };
            (app_server, source.apps_with_version)
        }
        None => (options.app_server.clone(), options.explicit_apps()),
    };

    let deployment_date = format_deployment_date(options.deployment_date.as_deref())
        .map_err(|message| DeployError::Validation(vec![message]))?;

    Ok(DeploymentRequest {
        release_name: options.release.clone().filter(|r| !r.is_empty()),
        app_server_name: app_server,
        environment_name: options.environment.clone(),
        apps_with_version: apps,
        deployment_parameters: options.parameters(),
        context_ids: None,
        deployment_date,
        send_email: options.send_email,
        request_only: options.request_only,
        simulate: options.simulate,
        execute_shakedown_test: options.execute_shakedown_test,
        neighbourhood_test: options.neighbourhood_test,
    })
}
