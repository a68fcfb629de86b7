//! Deployment, replica and observability models

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A running (or starting/stopping) instance of a photon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub name: String,
    pub photon_id: String,
    /// Creation time, milliseconds since the Unix epoch
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub status: DeploymentStatus,
    pub resource_requirement: ResourceRequirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envs: Option<Vec<DeploymentEnv>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Vec<DeploymentMount>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    #[serde(default)]
    pub endpoint: DeploymentEndpoint,
    #[serde(default)]
    pub state: DeploymentState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEndpoint {
    #[serde(default)]
    pub internal_endpoint: String,
    #[serde(default)]
    pub external_endpoint: String,
}

/// Observed deployment state. States the client does not know are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentState {
    Running,
    NotReady,
    Starting,
    Updating,
    Stopping,
    Deleting,
    Failed,
    #[default]
    Unknown,
    Other(String),
}

impl DeploymentState {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentState::Running => "Running",
            DeploymentState::NotReady => "Not Ready",
            DeploymentState::Starting => "Starting",
            DeploymentState::Updating => "Updating",
            DeploymentState::Stopping => "Stopping",
            DeploymentState::Deleting => "Deleting",
            DeploymentState::Failed => "Failed",
            DeploymentState::Unknown => "Unknown",
            DeploymentState::Other(s) => s,
        }
    }
}

impl From<String> for DeploymentState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Running" => DeploymentState::Running,
            "Not Ready" => DeploymentState::NotReady,
            "Starting" => DeploymentState::Starting,
            "Updating" => DeploymentState::Updating,
            "Stopping" => DeploymentState::Stopping,
            "Deleting" => DeploymentState::Deleting,
            "Failed" => DeploymentState::Failed,
            "" | "Unknown" => DeploymentState::Unknown,
            _ => DeploymentState::Other(s),
        }
    }
}

impl From<DeploymentState> for String {
    fn from(state: DeploymentState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    #[serde(default)]
    pub cpu: f64,
    /// Memory in MiB
    #[serde(default)]
    pub memory: i64,
    #[serde(default)]
    pub min_replicas: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator_num: Option<f64>,
}

/// Environment variable, either a literal value or a secret reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeploymentEnv {
    Plain { name: String, value: String },
    Secret { name: String, value_from: SecretRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub secret_name_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentMount {
    pub path: String,
    pub mount_path: String,
}

/// Body of a create-deployment call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDeployment {
    pub name: String,
    pub photon_id: String,
    pub resource_requirement: NewResourceRequirement,
    #[serde(default)]
    pub envs: Vec<DeploymentEnv>,
    #[serde(default)]
    pub mounts: Vec<DeploymentMount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResourceRequirement {
    pub min_replicas: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_shape: Option<String>,
}

/// Partial update; the server only honours the photon id and replica count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photon_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_requirement: Option<ResourceRequirementPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<u32>,
}

/// One scaled instance backing a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replica {
    pub id: String,
}

/// Backend explanation for why a replica is or isn't serving traffic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReadinessReason {
    Ready,
    InProgress,
    NoCapacity,
    UserCodeError,
    SystemError,
    Unknown,
    Other(String),
}

impl ReadinessReason {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessReason::Ready)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReadinessReason::Ready => "Ready",
            ReadinessReason::InProgress => "InProgress",
            ReadinessReason::NoCapacity => "NoCapacity",
            ReadinessReason::UserCodeError => "UserCodeError",
            ReadinessReason::SystemError => "SystemError",
            ReadinessReason::Unknown => "Unknown",
            ReadinessReason::Other(s) => s,
        }
    }
}

impl From<String> for ReadinessReason {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Ready" => ReadinessReason::Ready,
            "InProgress" => ReadinessReason::InProgress,
            "NoCapacity" => ReadinessReason::NoCapacity,
            "UserCodeError" => ReadinessReason::UserCodeError,
            "SystemError" => ReadinessReason::SystemError,
            "Unknown" => ReadinessReason::Unknown,
            _ => ReadinessReason::Other(s),
        }
    }
}

impl From<ReadinessReason> for String {
    fn from(reason: ReadinessReason) -> Self {
        reason.as_str().to_string()
    }
}

impl fmt::Display for ReadinessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessEntry {
    pub reason: ReadinessReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness entries keyed by replica id
pub type DeploymentReadiness = HashMap<String, Vec<ReadinessEntry>>;

/// Kubernetes-style event attached to a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub last_observed_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricLabels {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

/// A named series; values are string encoded and may hold sentinels like "NaN"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric: MetricLabels,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}
