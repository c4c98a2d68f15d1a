use crate::error::{Result, WrapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SECRET_KEY_ENV: &str = "WRAPWEB_SECRET_KEY";

// ---------------------------------------------------------------------------
// DispatchMode / NotFoundStatus
// ---------------------------------------------------------------------------

/// How a verified webhook hands its regeneration to the updater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Run the update inside the request and report its outcome.
    #[default]
    Inline,
    /// Acknowledge with 202 and run the update on a background task.
    Queued,
}

/// HTTP status used for "No such project" / "No such entry" responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundStatus {
    /// 500, as deployed clients have always seen it.
    #[default]
    Legacy,
    /// 404.
    Http,
}

impl NotFoundStatus {
    pub fn code(&self) -> u16 {
        match self {
            NotFoundStatus::Legacy => 500,
            NotFoundStatus::Http => 404,
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookPolicy {
    /// GitHub organization whose repositories may trigger updates.
    pub namespace: String,
    /// Branch that is never regenerated from a webhook.
    pub protected_branch: String,
}

impl Default for WebhookPolicy {
    fn default() -> Self {
        Self {
            namespace: "mesonbuild".to_string(),
            protected_branch: "master".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// UpdaterConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    pub program: String,
    /// Passed before `<project> <clone_url> <branch>`.
    pub args: Vec<String>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            program: "wrapupdater".to_string(),
            args: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub secret_key: String,
    pub database: PathBuf,
    pub bind: String,
    pub dispatch: DispatchMode,
    pub not_found_status: NotFoundStatus,
    pub webhook: WebhookPolicy,
    pub updater: UpdaterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            database: PathBuf::from("wrapdb.sqlite"),
            bind: "0.0.0.0:5000".to_string(),
            dispatch: DispatchMode::default(),
            not_found_status: NotFoundStatus::default(),
            webhook: WebhookPolicy::default(),
            updater: UpdaterConfig::default(),
        }
    }
}

impl Config {
    /// Load the YAML config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(data)?;
        Ok(cfg)
    }

    /// Checks required before the server may accept webhooks.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            return Err(WrapError::Config(format!(
                "secret_key is empty; set it in the config file or via {SECRET_KEY_ENV}"
            )));
        }
        if self.updater.program.trim().is_empty() {
            return Err(WrapError::Config("updater.program is empty".into()));
        }
        Ok(())
    }
}
