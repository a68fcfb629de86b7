//! Proxy user-defined inference calls to a deployment

use http::header::{HeaderName, HeaderValue};
use http::Method;
use url::Url;

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::http::request::{ApiRequest, ApiResponse, RequestBody, RequestContext};

pub const DEPLOYMENT_HEADER: &str = "x-lepton-deployment";

/// A request built from a deployment's OpenAPI description
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub method: Method,
    /// Target URL; only its path, query and fragment are kept
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpClient {
    /// Send `request` to the deployment named `name` through the workspace host
    ///
    /// Failures are returned to the caller without notifying the user.
    pub async fn request_deployment(
        &self,
        name: &str,
        request: InferenceRequest,
    ) -> Result<ApiResponse, DashError> {
        let mut url = self.workspace().url.clone();
        url.set_path(request.url.path());
        url.set_query(request.url.query());
        url.set_fragment(request.url.fragment());

        let mut api_request = ApiRequest::new(request.method, url)
            .with_timeout(Some(self.timeout()))
            .with_context(RequestContext::ignore_all());
        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| DashError::ConfigError(format!("Invalid header {}: {}", key, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| DashError::ConfigError(format!("Invalid header {}: {}", key, e)))?;
            api_request.headers.append(name, value);
        }
        let deployment = HeaderValue::from_str(name)
            .map_err(|e| DashError::ConfigError(format!("Invalid deployment name {}: {}", name, e)))?;
        api_request
            .headers
            .insert(HeaderName::from_static(DEPLOYMENT_HEADER), deployment);

        if let Some(body) = request.body {
            api_request.body = RequestBody::Json(body);
        }

        self.execute(api_request).await
    }
}
