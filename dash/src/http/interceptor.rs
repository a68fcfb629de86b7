//! Ordered middleware chain wrapped around the transport
//!
//! Every outbound call passes through [`Next::run`]. Each interceptor may
//! rewrite the request, call the rest of the chain, and inspect or replace
//! the outcome. When the chain is exhausted the transport is called and a
//! non-2xx response is turned into [`DashError::ApiError`].

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use openapi_client::models::ErrorResponse;
use tracing::debug;

use crate::errors::{ApiError, DashError};
use crate::http::request::{ApiRequest, ApiResponse};
use crate::http::transport::Transport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse, DashError>;
}

/// The remainder of the chain
pub struct Next<'a> {
    chain: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub fn new(chain: &'a [Arc<dyn Interceptor>], transport: &'a dyn Transport) -> Self {
        Self { chain, transport }
    }

    pub async fn run(self, request: ApiRequest) -> Result<ApiResponse, DashError> {
        match self.chain.split_first() {
            Some((head, tail)) => {
                head.intercept(
                    request,
                    Next {
                        chain: tail,
                        transport: self.transport,
                    },
                )
                .await
            }
            None => {
                let response = self.transport.send(request).await?;
                ensure_success(response).await
            }
        }
    }
}

/// Pass 2xx responses through, turn anything else into an [`ApiError`]
pub async fn ensure_success(response: ApiResponse) -> Result<ApiResponse, DashError> {
    if response.status.is_success() {
        return Ok(response);
    }

    let status = response.status;
    let request_id = response
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();
    let parsed: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();

    Err(DashError::ApiError(ApiError {
        status,
        code: parsed.code,
        message: parsed.message,
        request_id,
        body,
    }))
}

/// Logs method, URL, outcome and latency of every call
pub struct TracingInterceptor;

#[async_trait]
impl Interceptor for TracingInterceptor {
    async fn intercept(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse, DashError> {
        let method = request.method.clone();
        let url = request.url.clone();
        let started = Instant::now();

        let result = next.run(request).await;
        let elapsed = started.elapsed();
        match &result {
            Ok(response) => debug!("{} {} -> {} in {:?}", method, url, response.status, elapsed),
            Err(e) => debug!("{} {} failed in {:?}: {}", method, url, elapsed, e),
        }
        result
    }
}
