//! Fine-tune job API client

use bytes::Bytes;
use http::Method;
use openapi_client::models::{FineTuneJob, FineTuneJobStatus};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::{ApiRequest, RequestBody, RequestContext};

impl HttpClient {
    /// List jobs, optionally only those in `status`
    pub async fn list_fine_tune_jobs(
        &self,
        status: Option<FineTuneJobStatus>,
    ) -> Result<Vec<FineTuneJob>, DashError> {
        let path = match status {
            Some(status) => format!("/tuna/job/list/{}", status),
            None => "/tuna/job/list".to_string(),
        };
        self.get(&path, RequestContext::default()).await
    }

    /// Submit a training data file as a new job
    pub async fn add_fine_tune_job(&self, file_name: &str, data: Bytes) -> Result<FineTuneJob, DashError> {
        let mut url = self.url("/tuna/job/add")?;
        url.query_pairs_mut().append_pair("name", file_name);

        let request = ApiRequest::new(Method::POST, url)
            .with_body(RequestBody::Multipart {
                field: "data".to_string(),
                file_name: file_name.to_string(),
                data,
            })
            .with_timeout(Some(self.timeout()));
        self.execute(request).await?.json().await
    }

    pub async fn cancel_fine_tune_job(&self, job_id: i64) -> Result<(), DashError> {
        let path = format!("/tuna/job/cancel/{}", job_id);
        let _: serde_json::Value = self.get(&path, RequestContext::default()).await?;
        Ok(())
    }

    pub async fn get_fine_tune_job(&self, job_id: i64) -> Result<FineTuneJob, DashError> {
        let path = format!("/tuna/job/{}", job_id);
        self.get(&path, RequestContext::default()).await
    }
}
