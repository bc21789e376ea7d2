use log::info;

use crate::error::{AutoPrError, Result};

use super::core::{failure, ApiClient};
use super::types::{SubmissionReceipt, SubmissionRequest};

impl SubmissionRequest {
    /// Builds a submission, trimming the inputs and rejecting empty required fields.
    ///
    /// # Errors
    ///
    /// Returns [`AutoPrError::Validation`] if the repository URL or the prompt is blank.
    pub fn new(
        repository_url: &str,
        modification_prompt: &str,
        github_username: Option<&str>,
    ) -> Result<Self> {
        let repository_url = repository_url.trim();
        let modification_prompt = modification_prompt.trim();

        if repository_url.is_empty() || modification_prompt.is_empty() {
            return Err(AutoPrError::Validation(
                "Repository URL and modification prompt are required".to_string(),
            ));
        }

        Ok(Self {
            repository_url: repository_url.to_string(),
            modification_prompt: modification_prompt.to_string(),
            github_username: github_username
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string),
        })
    }
}

impl ApiClient {
    /// Submits a job and returns the identifier to track it with.
    ///
    /// # Errors
    ///
    /// - [`AutoPrError::RateLimited`] on HTTP 429
    /// - [`AutoPrError::Api`] on any other unsuccessful status
    /// - [`AutoPrError::Network`] if the request cannot be sent or the body is not valid JSON
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt> {
        info!("Submitting job for repository: {}", request.repository_url);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        let receipt: SubmissionReceipt = response.json().await?;
        info!("Job accepted with request id {}", receipt.request_id);

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::JobId;
    use mockito::Matcher;
    use std::time::Duration;

    fn client(server: &mockito::Server) -> ApiClient {
        ApiClient::new(&format!("{}/prod/process", server.url()), Duration::from_secs(5)).unwrap()
    }

    fn request() -> SubmissionRequest {
        SubmissionRequest::new("https://github.com/x/y", "Add a README", Some("octocat")).unwrap()
    }

    #[test]
    fn test_blank_fields_fail_validation() {
        assert!(matches!(
            SubmissionRequest::new("  ", "Add a README", None),
            Err(AutoPrError::Validation(_))
        ));
        assert!(matches!(
            SubmissionRequest::new("https://github.com/x/y", "\n", None),
            Err(AutoPrError::Validation(_))
        ));
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let request = SubmissionRequest::new(" https://github.com/x/y ", " Fix typo ", Some(" "))
            .unwrap();
        assert_eq!(request.repository_url, "https://github.com/x/y");
        assert_eq!(request.modification_prompt, "Fix typo");
        assert!(request.github_username.is_none());
    }

    #[tokio::test]
    async fn test_submit_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/prod/process")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "repositoryUrl": "https://github.com/x/y",
                "modificationPrompt": "Add a README",
                "githubUsername": "octocat"
            })))
            .with_status(202)
            .with_body(r#"{"requestId":"req-42","repository":"https://github.com/x/y","message":"Queued"}"#)
            .create_async()
            .await;

        let receipt = client(&server).submit(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.request_id, JobId::from("req-42"));
        assert_eq!(receipt.message.as_deref(), Some("Queued"));
    }

    #[tokio::test]
    async fn test_submit_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/prod/process")
            .with_status(429)
            .with_body(r#"{"error":"Too many submissions","rateLimit":{"limit":10,"used":10,"resetAt":4102444800}}"#)
            .create_async()
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();

        let AutoPrError::RateLimited(notice) = err else {
            panic!("expected a rate limit error, got {err:?}");
        };
        assert_eq!(notice.message, "Too many submissions");
        assert_eq!(notice.info.map(|info| info.limit), Some(10));
        assert!(notice.reset_time_relative.unwrap().starts_with("in "));
    }

    #[tokio::test]
    async fn test_submit_server_error_uses_body_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/prod/process")
            .with_status(400)
            .with_body(r#"{"message":"Repository not found"}"#)
            .create_async()
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();

        assert!(matches!(
            err,
            AutoPrError::Api { status: 400, ref message } if message == "Repository not found"
        ));
    }

    #[tokio::test]
    async fn test_submit_error_falls_back_to_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/prod/process")
            .with_status(500)
            .with_body(r#"{"error":"Internal failure"}"#)
            .create_async()
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API request failed (status 500): Internal failure"
        );
    }
}
