//! HTTP client for the workspace API

use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::errors::DashError;
use crate::http::interceptor::{Interceptor, Next};
use crate::http::request::{ApiRequest, ApiResponse, RequestBody, RequestContext};
use crate::http::transport::Transport;

pub const API_VERSION_PREFIX: &str = "/api/v1";

/// The workspace every call of a client is addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    pub id: String,
    /// Workspace API host, e.g. `https://abc.cloud.lepton.ai`
    pub url: Url,
}

impl WorkspaceContext {
    pub fn new(id: impl Into<String>, url: &str) -> Result<Self, DashError> {
        let url = Url::parse(url.trim_end_matches('/'))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DashError::ConfigError(format!(
                "Invalid workspace URL scheme: {}",
                url.scheme()
            )));
        }
        Ok(Self { id: id.into(), url })
    }
}

/// HTTP client for the workspace API
///
/// Every request runs through the interceptor chain before reaching the
/// transport.
pub struct HttpClient {
    workspace: WorkspaceContext,
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(workspace: WorkspaceContext, transport: Arc<dyn Transport>) -> Self {
        Self {
            workspace,
            transport,
            interceptors: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Append an interceptor; the first added runs outermost
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Timeout applied to non-streaming requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn workspace(&self) -> &WorkspaceContext {
        &self.workspace
    }

    /// Workspace host without scheme, e.g. `abc.cloud.lepton.ai`
    pub fn host(&self) -> String {
        crate::http::request::host_of(&self.workspace.url).unwrap_or_default()
    }

    /// Full URL of an API path, e.g. `/deployments` -> `<host>/api/v1/deployments`
    pub fn url(&self, path: &str) -> Result<Url, DashError> {
        let base = self.workspace.url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}{}", base, API_VERSION_PREFIX, path))?)
    }

    /// Send a prepared request through the chain
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, DashError> {
        Next::new(&self.interceptors, self.transport.as_ref())
            .run(request)
            .await
    }

    /// Send a request and decode the JSON response
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        context: RequestContext,
    ) -> Result<T, DashError> {
        let request = ApiRequest::new(method, self.url(path)?)
            .with_body(body)
            .with_timeout(Some(self.timeout))
            .with_context(context);
        self.execute(request).await?.json().await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str, context: RequestContext) -> Result<T, DashError> {
        self.request(Method::GET, path, RequestBody::Empty, context).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, DashError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.request(Method::POST, path, body, RequestContext::default()).await
    }

    /// Make a PATCH request with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, DashError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.request(Method::PATCH, path, body, RequestContext::default()).await
    }

    /// Make a PUT request without a body
    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashError> {
        self.request(Method::PUT, path, RequestBody::Empty, RequestContext::default()).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashError> {
        self.request(Method::DELETE, path, RequestBody::Empty, RequestContext::default()).await
    }

    /// Open a long-lived GET whose body is read incrementally; no timeout applies
    pub async fn stream(&self, path: &str, context: RequestContext) -> Result<ApiResponse, DashError> {
        let request = ApiRequest::new(Method::GET, self.url(path)?).with_context(context);
        self.execute(request).await
    }
}
