//! Secret API client

use openapi_client::models::Secret;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::RequestContext;

impl HttpClient {
    /// Create or overwrite a secret
    pub async fn create_secret(&self, secret: &Secret) -> Result<(), DashError> {
        let _: serde_json::Value = self.post("/secrets", &[secret]).await?;
        Ok(())
    }

    /// Names of the workspace secrets
    pub async fn list_secrets(&self) -> Result<Vec<String>, DashError> {
        self.get("/secrets", RequestContext::default()).await
    }

    pub async fn delete_secret(&self, name: &str) -> Result<(), DashError> {
        let path = format!("/secrets/{}", name);
        let _: serde_json::Value = self.delete(&path).await?;
        Ok(())
    }
}
