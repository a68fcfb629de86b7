//! Replica rows joined with their readiness issues

use std::cmp::Reverse;
use std::collections::HashSet;

use openapi_client::models::{DeploymentReadiness, ReadinessReason, Replica};

/// A non-ready readiness entry of one replica
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaIssue {
    /// `{replica_id}-readiness-{index}`, stable for a given refresh
    pub key: String,
    pub reason: ReadinessReason,
    pub message: Option<String>,
}

impl ReplicaIssue {
    /// The message, or the reason when the backend sent none
    pub fn display_message(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => self.reason.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaRow {
    pub replica: Replica,
    pub issues: Vec<ReplicaIssue>,
}

impl ReplicaRow {
    pub fn id(&self) -> &str {
        &self.replica.id
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// "1 issue" / "3 issues", `None` for a healthy replica
    pub fn issue_label(&self) -> Option<String> {
        match self.issues.len() {
            0 => None,
            1 => Some("1 issue".to_string()),
            n => Some(format!("{} issues", n)),
        }
    }
}

/// Join replicas with their readiness entries
///
/// Ready entries are dropped, a replica missing from `readiness` gets no
/// issues, and rows are ordered by issue count, most first. Ties keep the
/// input order. Duplicate replica ids keep their first occurrence.
pub fn build_rows(replicas: Vec<Replica>, readiness: &DeploymentReadiness) -> Vec<ReplicaRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<ReplicaRow> = replicas
        .into_iter()
        .filter(|replica| seen.insert(replica.id.clone()))
        .map(|replica| {
            let issues = readiness
                .get(&replica.id)
                .map(|entries| {
                    entries
                        .iter()
                        .filter(|e| !e.reason.is_ready())
                        .enumerate()
                        .map(|(i, e)| ReplicaIssue {
                            key: format!("{}-readiness-{}", replica.id, i),
                            reason: e.reason.clone(),
                            message: e.message.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            ReplicaRow { replica, issues }
        })
        .collect();

    // sort_by_key is stable
    rows.sort_by_key(|row| Reverse(row.issues.len()));
    rows
}

pub fn any_issues(rows: &[ReplicaRow]) -> bool {
    rows.iter().any(ReplicaRow::has_issues)
}

/// Replica ids whose issue list is expanded, in the order they were opened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    keys: Vec<String>,
}

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, replica_id: &str) -> bool {
        self.keys.iter().any(|k| k == replica_id)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn expand(&mut self, replica_id: &str) {
        if !self.contains(replica_id) {
            self.keys.push(replica_id.to_string());
        }
    }

    pub fn collapse(&mut self, replica_id: &str) {
        self.keys.retain(|k| k != replica_id);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Re-derive after a refresh: only replicas still listed and still
    /// having issues stay expanded
    pub fn prune(&mut self, rows: &[ReplicaRow]) {
        self.keys
            .retain(|k| rows.iter().any(|row| row.id() == k && row.has_issues()));
    }
}
