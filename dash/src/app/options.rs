//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::workers::refresher;

/// What a session does once connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the deployments of the workspace and exit
    ListDeployments,

    /// Keep a replica readiness table of one deployment up to date
    WatchReplicas {
        deployment_id: String,
        /// Replicas whose issue details are shown in full
        expand: Vec<String>,
    },

    /// Follow the log of one replica until it ends
    TailLog {
        deployment_id: String,
        replica_id: String,
    },
}

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    pub workspace: WorkspaceOptions,

    pub mode: Mode,

    /// Timeout of non-streaming requests
    pub request_timeout: Duration,

    /// Timeout for establishing connections
    pub connect_timeout: Duration,

    /// Refresh worker options
    pub refresher: refresher::Options,

    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            workspace: WorkspaceOptions::default(),
            mode: Mode::ListDeployments,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            refresher: refresher::Options::default(),
            max_shutdown_delay: Duration::from_secs(5),
        }
    }
}

/// Workspace the session talks to
#[derive(Debug, Default)]
pub struct WorkspaceOptions {
    pub id: String,

    /// Workspace API base URL
    pub url: String,

    pub token: Option<SecretString>,
}
