//! Workspace storage API client

use bytes::Bytes;
use http::Method;
use openapi_client::models::FileInfo;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::{RequestBody, RequestContext};

fn storage_path(path: &str) -> String {
    format!("/storage/{}", path.trim_start_matches('/'))
}

impl HttpClient {
    /// Entries directly under `path`
    pub async fn list_storage_entries(&self, path: &str) -> Result<Vec<FileInfo>, DashError> {
        self.get(&storage_path(path), RequestContext::default()).await
    }

    pub async fn make_storage_directory(&self, path: &str) -> Result<(), DashError> {
        let _: serde_json::Value = self.put(&storage_path(path)).await?;
        Ok(())
    }

    /// Upload a file to `path`
    pub async fn upload_storage_file(
        &self,
        path: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<(), DashError> {
        let body = RequestBody::Multipart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            data,
        };
        let _: serde_json::Value = self
            .request(Method::POST, &storage_path(path), body, RequestContext::default())
            .await?;
        Ok(())
    }

    pub async fn remove_storage_entry(&self, path: &str) -> Result<(), DashError> {
        let _: serde_json::Value = self.delete(&storage_path(path)).await?;
        Ok(())
    }
}
