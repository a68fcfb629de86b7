//! API models

use serde::{Deserialize, Serialize};

mod deployment;
mod fine_tune;
mod photon;
mod storage;

pub use deployment::*;
pub use fine_tune::*;
pub use photon::*;
pub use storage::*;

/// Error body returned by the API server on non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A workspace secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub value: String,
}
