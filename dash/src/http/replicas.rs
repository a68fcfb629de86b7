//! Replica, readiness, metrics and log endpoints

use http::StatusCode;
use openapi_client::models::{DeploymentReadiness, Metric, Replica};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::{ApiResponse, RequestContext};

impl HttpClient {
    /// List replicas backing a deployment
    pub async fn list_deployment_replicas(&self, deployment_id: &str) -> Result<Vec<Replica>, DashError> {
        let path = format!("/deployments/{}/replicas", deployment_id);
        self.get(&path, RequestContext::default()).await
    }

    /// Readiness entries per replica
    ///
    /// A deployment without readiness data answers 404, which maps to an
    /// empty mapping.
    pub async fn get_deployment_readiness(
        &self,
        deployment_id: &str,
    ) -> Result<DeploymentReadiness, DashError> {
        let path = format!("/deployments/{}/readiness", deployment_id);
        match self.get(&path, RequestContext::ignore_all()).await {
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => Ok(DeploymentReadiness::new()),
            other => other,
        }
    }

    /// Deployment-wide metric series
    pub async fn get_deployment_metrics(
        &self,
        deployment_id: &str,
        metric_name: &str,
    ) -> Result<Vec<Metric>, DashError> {
        let path = format!("/deployments/{}/monitoring/{}", deployment_id, metric_name);
        self.get(&path, RequestContext::default()).await
    }

    /// Metric series of one replica
    pub async fn get_deployment_replica_metrics(
        &self,
        deployment_id: &str,
        replica_id: &str,
        metric_name: &str,
    ) -> Result<Vec<Metric>, DashError> {
        let path = format!(
            "/deployments/{}/replicas/{}/monitoring/{}",
            deployment_id, replica_id, metric_name
        );
        self.get(&path, RequestContext::default()).await
    }

    /// Open the chunked log stream of a replica
    pub async fn open_deployment_replica_log(
        &self,
        deployment_id: &str,
        replica_id: &str,
    ) -> Result<ApiResponse, DashError> {
        let path = format!("/deployments/{}/replicas/{}/log", deployment_id, replica_id);
        self.stream(&path, RequestContext::default()).await
    }

    /// WebSocket URL of the interactive shell of a replica
    pub fn replica_shell_url(&self, deployment_id: &str, replica_id: &str) -> String {
        format!(
            "wss://{}/api/v1/deployments/{}/replicas/{}/shell",
            self.host(),
            deployment_id,
            replica_id
        )
    }
}
