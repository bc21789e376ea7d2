use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one submitted pipeline run, as issued by the submission endpoint.
///
/// Never reused across runs; it is the only key used for status queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The server's report about a job at one poll instant.
///
/// Snapshots are never mutated; each poll replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Job this report belongs to
    pub job_id: JobId,
    /// Raw status token (a stage id, or `completed` / `rejected` / `error`)
    pub raw_status: String,
    /// Human readable progress message from the server
    pub message: String,
    /// Step counter reported by the server
    pub step: u32,
    /// Server timestamp of the report, in epoch seconds
    pub timestamp_seconds: i64,
    /// Repository the job operates on
    pub repository: String,
    /// Pull request URL, present once the job has completed
    pub artifact_url: Option<String>,
    /// Error details for rejected or failed jobs
    pub diagnostic: Option<String>,
}

#[cfg(test)]
impl StatusSnapshot {
    /// Creates a snapshot carrying only a job id and a status token.
    pub fn new(job_id: JobId, raw_status: impl Into<String>) -> Self {
        Self {
            job_id,
            raw_status: raw_status.into(),
            message: String::new(),
            step: 0,
            timestamp_seconds: 0,
            repository: String::new(),
            artifact_url: None,
            diagnostic: None,
        }
    }

    #[must_use]
    pub fn with_artifact_url(mut self, url: impl Into<String>) -> Self {
        self.artifact_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_display() {
        let id = JobId::from("req-123");
        assert_eq!(id.to_string(), "req-123");
        assert_eq!(id.as_str(), "req-123");
    }

    #[test]
    fn test_job_id_serializes_as_plain_string() {
        let id = JobId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_snapshot_builders() {
        let snapshot = StatusSnapshot::new(JobId::from("abc"), "completed")
            .with_artifact_url("https://github.com/x/y/pull/1")
            .with_repository("https://github.com/x/y");

        assert_eq!(snapshot.raw_status, "completed");
        assert_eq!(
            snapshot.artifact_url.as_deref(),
            Some("https://github.com/x/y/pull/1")
        );
        assert_eq!(snapshot.repository, "https://github.com/x/y");
        assert!(snapshot.diagnostic.is_none());
    }
}
