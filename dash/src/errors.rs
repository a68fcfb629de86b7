//! Error types for the Lepton workspace client

use http::StatusCode;
use thiserror::Error;

/// A non-2xx response from the API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    /// Backend error code, when the body carried one
    pub code: Option<String>,
    /// Backend error message, when the body carried one
    pub message: Option<String>,
    /// Value of the `x-request-id` response header
    pub request_id: Option<String>,
    /// Raw response body
    pub body: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{} {}: {}", self.status, code, message),
            (None, Some(message)) => write!(f, "{}: {}", self.status, message),
            _ if !self.body.is_empty() => write!(f, "{}: {}", self.status, self.body),
            _ => write!(f, "{}", self.status),
        }
    }
}

/// Main error type for the client
#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("WebSocket error: {0}")]
    WebSocketError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("API error: {0}")]
    ApiError(ApiError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashError {
    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DashError::ApiError(e) => Some(e.status),
            DashError::HttpError(e) => e.status(),
            DashError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            DashError::ApiError(e) => e.request_id.as_deref(),
            _ => None,
        }
    }

    /// Backend error code, or a generic kind for errors without one
    pub fn code(&self) -> String {
        match self {
            DashError::ApiError(ApiError {
                code: Some(code), ..
            }) => code.clone(),
            DashError::ApiError(e) => format!("ERR_BAD_RESPONSE ({})", e.status.as_u16()),
            DashError::HttpError(e) if e.is_timeout() => "ETIMEDOUT".to_string(),
            DashError::HttpError(e) if e.is_connect() => "ERR_NETWORK".to_string(),
            DashError::HttpError(_) => "ERR_HTTP".to_string(),
            DashError::Unauthorized => "UNAUTHORIZED".to_string(),
            DashError::JsonError(_) => "ERR_BAD_BODY".to_string(),
            _ => "ERR_CLIENT".to_string(),
        }
    }

    /// Backend error message, or the error text itself
    pub fn message(&self) -> String {
        match self {
            DashError::ApiError(ApiError {
                message: Some(message),
                ..
            }) => message.clone(),
            other => other.to_string(),
        }
    }
}
