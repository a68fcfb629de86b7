//! Network transport behind the interceptor chain

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{multipart, Client};
use tracing::debug;

use crate::errors::DashError;
use crate::http::request::{ApiRequest, ApiResponse, RequestBody, ResponseBody};

/// Sends a request and returns the response whatever its status
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DashError>;
}

/// Transport backed by `reqwest`
///
/// Dropping the returned future, or the response body stream, aborts the
/// underlying connection.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, DashError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, DashError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart {
                field,
                file_name,
                data,
            } => {
                let part = multipart::Part::stream(data).file_name(file_name);
                builder.multipart(multipart::Form::new().part(field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(DashError::from));

        Ok(ApiResponse {
            status,
            headers,
            body: ResponseBody::from_stream(body),
        })
    }
}
