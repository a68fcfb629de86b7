//! Request and response types shared by the transport and the interceptor chain

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::DashError;

/// Which error responses the caller handles itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IgnoreErrors {
    /// Every error is surfaced to the user
    #[default]
    None,
    /// No error is surfaced
    All,
    /// Only the listed statuses are kept quiet
    Statuses(Vec<u16>),
}

impl IgnoreErrors {
    /// Whether an error with this status (or without one) stays silent
    pub fn ignores(&self, status: Option<StatusCode>) -> bool {
        match self {
            IgnoreErrors::None => false,
            IgnoreErrors::All => true,
            IgnoreErrors::Statuses(codes) => {
                status.is_some_and(|s| codes.contains(&s.as_u16()))
            }
        }
    }

    /// Only an explicit status list opts out of the logout on 401
    pub fn ignores_unauthorized(&self) -> bool {
        match self {
            IgnoreErrors::Statuses(codes) => codes.contains(&StatusCode::UNAUTHORIZED.as_u16()),
            _ => false,
        }
    }
}

/// Request-scoped options read by the interceptors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub ignore_errors: IgnoreErrors,
}

impl RequestContext {
    pub fn ignore_all() -> Self {
        Self {
            ignore_errors: IgnoreErrors::All,
        }
    }

    pub fn ignore_statuses(statuses: impl IntoIterator<Item = u16>) -> Self {
        Self {
            ignore_errors: IgnoreErrors::Statuses(statuses.into_iter().collect()),
        }
    }
}

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// A single file sent as `multipart/form-data`
    Multipart {
        field: String,
        file_name: String,
        data: Bytes,
    },
}

/// An outbound request as seen by interceptors
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
    /// Whole-request timeout; `None` for long-lived streams
    pub timeout: Option<Duration>,
    pub context: RequestContext,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            timeout: None,
            context: RequestContext::default(),
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// `host[:port]` of the target, port only when it is not the scheme default
    pub fn host(&self) -> Option<String> {
        host_of(&self.url)
    }
}

pub fn host_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Response body as a stream of chunks
pub struct ResponseBody(BoxStream<'static, Result<Bytes, DashError>>);

impl ResponseBody {
    pub fn empty() -> Self {
        Self(stream::empty().boxed())
    }

    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self(stream::once(async move { Ok(data) }).boxed())
    }

    pub fn from_stream(s: impl futures::Stream<Item = Result<Bytes, DashError>> + Send + 'static) -> Self {
        Self(s.boxed())
    }

    pub fn into_stream(self) -> BoxStream<'static, Result<Bytes, DashError>> {
        self.0
    }

    /// Read the whole body into memory
    pub async fn collect(self) -> Result<Bytes, DashError> {
        let mut buf = BytesMut::new();
        let mut s = self.0;
        while let Some(chunk) = s.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResponseBody(..)")
    }
}

/// An inbound response as seen by interceptors
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Decode the body as JSON; an empty body decodes as `null`
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, DashError> {
        let data = self.body.collect().await?;
        if data.is_empty() {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn text(self) -> Result<String, DashError> {
        let data = self.body.collect().await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}
