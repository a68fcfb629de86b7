//! Settings file management

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::DashError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Workspace to talk to
    #[serde(default)]
    pub workspace: WorkspaceSettings,

    /// Seconds between automatic refreshes of watched views
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Timeout of non-streaming requests, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_refresh_interval() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            workspace: WorkspaceSettings::default(),
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Settings {
    /// Read settings from `file`; a missing file yields the defaults
    pub async fn load(file: &File) -> Result<Self, DashError> {
        if !file.exists().await {
            info!("No settings at {}, using defaults", file.path().display());
            return Ok(Self::default());
        }
        file.read_json().await
    }

    /// Persist settings, readable by the owner only since they hold a token
    pub async fn save(&self, file: &File) -> Result<(), DashError> {
        file.write_json(self).await?;
        file.set_permissions_600().await
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Workspace connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub id: String,

    /// Workspace API base URL, e.g. `https://xyz.cloud.lepton.ai`
    #[serde(default)]
    pub url: String,

    #[serde(default, serialize_with = "serialize_token")]
    pub token: Option<SecretString>,
}

fn serialize_token<S>(token: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use secrecy::ExposeSecret;
    match token {
        Some(token) => serializer.serialize_some(token.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl WorkspaceSettings {
    pub fn is_configured(&self) -> bool {
        !self.id.is_empty() && !self.url.is_empty()
    }
}
