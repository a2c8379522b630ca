pub mod error;
pub mod event;
pub mod handlers;
pub mod logging;
pub mod notifier;
pub mod payload;
pub mod transport;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{NotifierError, Result};
use crate::notifier::Notifier;
use crate::transport::HttpTransport;

pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOKS_URL";
pub const PIPELINE_NAME_VAR: &str = "PIPELINE_NAME";
pub const BIND_ADDRESS_VAR: &str = "BIND_ADDRESS";
pub const LOG_DIR_VAR: &str = "LOG_DIR";
pub const CONFIG_PATH_VAR: &str = "NOTIFIER_CONFIG";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8888";

/// Region baked into the console link.
pub const CONSOLE_REGION: &str = "us-east-1";

/// Destination and origin label for one notifier.
///
/// Values may be empty here; the notifier rejects empty values per invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifierConfig {
    pub webhook_url: String,
    pub pipeline_name: String,
}

impl NotifierConfig {
    pub fn new(webhook_url: impl Into<String>, pipeline_name: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            pipeline_name: pipeline_name.into(),
        }
    }

    /// Reads `DISCORD_WEBHOOKS_URL` and `PIPELINE_NAME`. Missing variables become empty strings.
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var(WEBHOOK_URL_VAR).unwrap_or_default(),
            pipeline_name: std::env::var(PIPELINE_NAME_VAR).unwrap_or_default(),
        }
    }

    /// Returns true if both values are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.webhook_url.is_empty() && !self.pipeline_name.is_empty()
    }

    /// Web console link for the configured pipeline.
    pub fn pipeline_url(&self) -> String {
        format!(
            "https://{region}.console.aws.amazon.com/codesuite/codepipeline/pipelines/{name}/view?region={region}",
            region = CONSOLE_REGION,
            name = self.pipeline_name
        )
    }
}

/// Settings for the host process itself
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub bind_address: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_dir: None,
        }
    }
}

/// Optional TOML file layout. Every key may be left out.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileConfig {
    pub webhook_url: Option<String>,
    pub pipeline_name: Option<String>,
    pub bind_address: Option<String>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub notifier: NotifierConfig,
    pub host: HostConfig,
}

impl Settings {
    /// Merge file values with environment lookups. Environment wins.
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &str, from_file: Option<String>| lookup(var).or(from_file);

        let notifier = NotifierConfig {
            webhook_url: pick(WEBHOOK_URL_VAR, file.webhook_url).unwrap_or_default(),
            pipeline_name: pick(PIPELINE_NAME_VAR, file.pipeline_name).unwrap_or_default(),
        };
        let host = HostConfig {
            bind_address: pick(BIND_ADDRESS_VAR, file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            log_dir: lookup(LOG_DIR_VAR).map(PathBuf::from).or(file.log_dir),
        };

        Self { notifier, host }
    }

    /// Load settings from the process environment and, if `NOTIFIER_CONFIG` is set, that file.
    pub fn from_env() -> Result<Self> {
        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => load_config_file(Path::new(&path))?,
            _ => FileConfig::default(),
        };
        Ok(Self::resolve(file, |var| std::env::var(var).ok()))
    }
}

/// Load and parse the configuration file
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        NotifierError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config: FileConfig = toml::from_str(&config_str).map_err(|e| {
        NotifierError::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(config)
}

pub struct AppState {
    pub notifier: Notifier<HttpTransport>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;
