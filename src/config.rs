// Client configuration (liimactl.toml / ~/.liimactl/config.toml)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LOCAL_CONFIG_FILE: &str = "liimactl.toml";
const HOME_CONFIG_DIR: &str = ".liimactl";
const HOME_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the Liima REST API, e.g. https://liima.example.com/AMW_rest/
    pub host: Option<String>,

    /// Basic authentication, only sent when a username is set
    pub username: Option<String>,
    pub password: Option<String>,

    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct TlsConfig {
    /// PEM client certificate for servers requiring TLS client authentication
    pub cert_file: Option<PathBuf>,
    /// PEM (PKCS#8) private key belonging to `cert_file`
    pub key_file: Option<PathBuf>,
    /// Additional trusted root certificates
    pub ca_file: Option<PathBuf>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

impl Config {
    /// Candidate config files, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(HOME_CONFIG_DIR).join(HOME_CONFIG_FILE));
        }
        paths
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `config_file` must exist. Otherwise the first existing
    /// search path is used, or defaults if there is none. Environment
    /// variables override the file and `host_flag` overrides everything.
    pub fn load(config_file: Option<&Path>, host_flag: Option<&str>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::load_file(path)?,
            None => match Self::search_paths().into_iter().find(|p| p.exists()) {
                Some(path) => Self::load_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok());

        if let Some(host) = host_flag {
            config.host = Some(host.to_string());
        }

        let errors = config.validate();
        if !errors.is_empty() {
            bail!("Config is invalid: {}", errors.join("; "));
        }

        Ok(config)
    }

    /// Parse a TOML config file, warning about keys this client ignores
    pub fn load_file(path: &Path) -> Result<Self> {
        info!("Using config file: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut unused_fields = Vec::new();
        let deserializer = toml::Deserializer::new(&content);
        let config: Config = serde_ignored::deserialize(deserializer, |field| {
            unused_fields.push(field.to_string());
        })
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        for field in &unused_fields {
            warn!(
                "Unknown configuration field in {}: {}",
                path.display(),
                field
            );
        }

        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("LIIMA_HOST") {
            self.host = Some(host);
        }
        if let Some(username) = lookup("LIIMA_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("LIIMA_PASSWORD") {
            self.password = Some(password);
        }
    }

    /// Every problem with the configuration, empty when valid
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.host.as_deref().map(str::trim) {
            None | Some("") => errors.push("host must be set".to_string()),
            Some(host) => {
                if let Err(e) = url::Url::parse(host) {
                    errors.push(format!("host '{}' is not a valid URL: {}", host, e));
                }
            }
        }

        if self.tls.cert_file.is_some() && self.tls.key_file.is_none() {
            errors.push("key_file can't be empty if cert_file is set".to_string());
        }

        errors
    }
}
