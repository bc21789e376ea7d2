use serde::{Deserialize, Serialize};

use crate::tracker::{JobId, StatusSnapshot};

/// Body of a job submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// URL of the repository to fork
    pub repository_url: String,
    /// Natural-language description of the change to make
    pub modification_prompt: String,
    /// GitHub user to credit, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
}

/// Successful submission response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub request_id: JobId,
    pub repository: Option<String>,
    pub message: Option<String>,
}

/// Body of a failed (non-429) response.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Status endpoint response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusResponse {
    pub request_id: JobId,
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub repository: String,
    pub pr_url: Option<String>,
    pub error_details: Option<String>,
}

impl From<StatusResponse> for StatusSnapshot {
    fn from(response: StatusResponse) -> Self {
        Self {
            job_id: response.request_id,
            raw_status: response.status,
            message: response.message,
            step: response.step,
            timestamp_seconds: response.timestamp,
            repository: response.repository,
            artifact_url: response.pr_url.filter(|url| !url.is_empty()),
            diagnostic: response.error_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_request_wire_format() {
        let request = SubmissionRequest {
            repository_url: "https://github.com/x/y".to_string(),
            modification_prompt: "Add a README".to_string(),
            github_username: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"repositoryUrl":"https://github.com/x/y","modificationPrompt":"Add a README"}"#
        );
    }

    #[test]
    fn test_status_response_to_snapshot() {
        let body = r#"{
            "requestId": "abc",
            "status": "completed",
            "message": "Pull request created",
            "step": 8,
            "timestamp": 1700000000,
            "repository": "https://github.com/x/y",
            "prUrl": "https://github.com/x/y/pull/1"
        }"#;
        let response: StatusResponse = serde_json::from_str(body).unwrap();
        let snapshot = StatusSnapshot::from(response);

        assert_eq!(snapshot.job_id, JobId::from("abc"));
        assert_eq!(snapshot.raw_status, "completed");
        assert_eq!(snapshot.step, 8);
        assert_eq!(snapshot.timestamp_seconds, 1_700_000_000);
        assert_eq!(
            snapshot.artifact_url.as_deref(),
            Some("https://github.com/x/y/pull/1")
        );
        assert!(snapshot.diagnostic.is_none());
    }

    #[test]
    fn test_empty_pr_url_is_treated_as_missing() {
        let body = r#"{"requestId":"abc","status":"completed","prUrl":""}"#;
        let snapshot = StatusSnapshot::from(serde_json::from_str::<StatusResponse>(body).unwrap());
        assert!(snapshot.artifact_url.is_none());
    }
}
