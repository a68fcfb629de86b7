//! Fine-tune job models

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineTuneJobStatus {
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FineTuneJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineTuneJobStatus::Pending => "PENDING",
            FineTuneJobStatus::Running => "RUNNING",
            FineTuneJobStatus::Success => "SUCCESS",
            FineTuneJobStatus::Failed => "FAILED",
            FineTuneJobStatus::Cancelled => "CANCELLED",
            FineTuneJobStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FineTuneJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineTuneJob {
    pub id: i64,
    pub status: FineTuneJobStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub modified_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}
