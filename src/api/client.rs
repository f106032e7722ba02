use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Certificate, Client, Identity, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

use super::error::ApiError;
use crate::config::Config;

/// Reads are retried on connection errors, writes never are
const MAX_READ_ATTEMPTS: usize = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_IDLE_CONNECTIONS: usize = 10;

/// Transport seam used by every workflow.
///
/// `path` is relative to the configured server base URL and may carry a
/// query string. The raw response body is returned on any 2xx status.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError>;
}

/// GET `path` and decode the JSON response
pub async fn get_json<T: DeserializeOwned>(
    client: &dyn RestClient,
    path: &str,
) -> Result<T, ApiError> {
    let body = client.do_request(Method::GET, path, None).await?;
    decode(body)
}

/// POST `payload` as JSON to `path` and decode the JSON response
pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &dyn RestClient,
    path: &str,
    payload: &B,
) -> Result<T, ApiError> {
    let payload = serde_json::to_value(payload).map_err(ApiError::Encode)?;
    let body = client.do_request(Method::POST, path, Some(payload)).await?;
    decode(body)
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, ApiError> {
    serde_json::from_str(&body).map_err(|source| ApiError::Decode { source, body })
}

/// HTTP client for a Liima server
pub struct LiimaClient {
    http_client: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl LiimaClient {
    /// Build a client from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let host = config
            .host
            .as_deref()
            .context("No Liima host configured. Use --host or set LIIMA_HOST")?;

        // Url::join drops the last path segment unless the base ends with a slash
        let mut base = host.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).with_context(|| format!("Invalid host URL '{}'", host))?;

        let tls = &config.tls;
        let mut builder = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(IDLE_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .danger_accept_invalid_certs(tls.insecure_skip_verify);

        if let Some(cert_file) = &tls.cert_file {
            let key_file = tls
                .key_file
                .as_ref()
                .context("key_file can't be empty if cert_file is set")?;
            let cert = std::fs::read(cert_file).with_context(|| {
                format!("Failed to read client certificate {}", cert_file.display())
            })?;
            let key = std::fs::read(key_file)
                .with_context(|| format!("Failed to read client key {}", key_file.display()))?;
            let identity = Identity::from_pkcs8_pem(&cert, &key)
                .context("Failed to load TLS client certificate")?;
            builder = builder.identity(identity);
        }

        if let Some(ca_file) = &tls.ca_file {
            let pem = std::fs::read(ca_file)
                .with_context(|| format!("Failed to read CA file {}", ca_file.display()))?;
            for cert in Certificate::from_pem_bundle(&pem).context("Failed to parse CA file")? {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http_client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url,
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl RestClient for LiimaClient {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| ApiError::InvalidUrl(path.to_string()))?;

        let max_attempts = if method == Method::GET {
            MAX_READ_ATTEMPTS
        } else {
            1
        };

        let mut attempt = 1;
        let response = loop {
            debug!("{} {} (attempt {}/{})", method, url, attempt, max_attempts);

            let mut request = self
                .http_client
                .request(method.clone(), url.clone())
                .header(ACCEPT, "application/json")
                .header(CONTENT_TYPE, "application/json");
            if let Some(username) = &self.username {
                request = request.basic_auth(username, self.password.as_ref());
            }
            if let Some(payload) = &body {
                request = request.json(payload);
            }

            match request.send().await {
                Ok(response) => break response,
                Err(e) if attempt < max_attempts => {
                    warn!("Error http request {}: {}", url, e);
                    attempt += 1;
                }
                Err(source) => {
                    return Err(ApiError::Transport {
                        url: url.to_string(),
                        source,
                    })
                }
            }
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            let err = ApiError::Status { status, body: text };
            // callers expect the answer of an inactive node
            if !err.is_node_inactive() {
                error!(url = %url, "Response error on request: {}", err);
            }
            return Err(err);
        }

        Ok(text)
    }
}
