//! Deployment API client

use openapi_client::models::{Deployment, DeploymentEvent, DeploymentPatch, NewDeployment};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::RequestContext;
use crate::models::hardware::selectable_shapes;

impl HttpClient {
    /// List deployments of the workspace
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>, DashError> {
        self.get("/deployments", RequestContext::default()).await
    }

    /// Get a single deployment
    pub async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment, DashError> {
        let path = format!("/deployments/{}", deployment_id);
        self.get(&path, RequestContext::default()).await
    }

    /// Create a deployment
    ///
    /// A requested resource shape must be one offered for new deployments.
    pub async fn create_deployment(&self, deployment: &NewDeployment) -> Result<(), DashError> {
        if let Some(shape) = deployment.resource_requirement.resource_shape.as_deref() {
            if !selectable_shapes().contains(&shape) {
                return Err(DashError::ConfigError(format!(
                    "Resource shape {} is not available for new deployments",
                    shape
                )));
            }
        }
        let _: serde_json::Value = self.post("/deployments", deployment).await?;
        Ok(())
    }

    /// Partially update a deployment
    pub async fn update_deployment(
        &self,
        deployment_id: &str,
        patch: &DeploymentPatch,
    ) -> Result<(), DashError> {
        let path = format!("/deployments/{}", deployment_id);
        let _: serde_json::Value = self.patch(&path, patch).await?;
        Ok(())
    }

    /// Delete a deployment
    pub async fn delete_deployment(&self, deployment_id: &str) -> Result<(), DashError> {
        let path = format!("/deployments/{}", deployment_id);
        let _: serde_json::Value = self.delete(&path).await?;
        Ok(())
    }

    /// List events recorded for a deployment
    pub async fn list_deployment_events(
        &self,
        deployment_id: &str,
    ) -> Result<Vec<DeploymentEvent>, DashError> {
        let path = format!("/deployments/{}/events", deployment_id);
        self.get(&path, RequestContext::default()).await
    }
}
