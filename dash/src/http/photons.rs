//! Photon API client

use bytes::Bytes;
use http::Method;
use openapi_client::models::Photon;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::{RequestBody, RequestContext};

impl HttpClient {
    pub async fn list_photons(&self) -> Result<Vec<Photon>, DashError> {
        self.get("/photons", RequestContext::default()).await
    }

    pub async fn delete_photon(&self, photon_id: &str) -> Result<(), DashError> {
        let path = format!("/photons/{}", photon_id);
        let _: serde_json::Value = self.delete(&path).await?;
        Ok(())
    }

    /// Upload a photon archive
    pub async fn create_photon(&self, file_name: &str, data: Bytes) -> Result<(), DashError> {
        let body = RequestBody::Multipart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            data,
        };
        let _: serde_json::Value = self
            .request(Method::POST, "/photons", body, RequestContext::default())
            .await?;
        Ok(())
    }

    /// Direct download URL of a photon archive
    pub fn photon_download_url(&self, photon_id: &str) -> Result<String, DashError> {
        let mut url = self.url(&format!("/photons/{}", photon_id))?;
        url.query_pairs_mut().append_pair("content", "true");
        Ok(url.to_string())
    }
}
