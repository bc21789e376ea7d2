use std::time::Duration;

use log::debug;
use reqwest::{Client, Response};
use url::Url;

use crate::error::{AutoPrError, Result};
use crate::tracker::interpret;

use super::types::ErrorBody;

/// HTTP client for the job submission and status endpoints.
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) endpoint: Url,
}

impl ApiClient {
    /// Creates a client for the given submission endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("autopr/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| AutoPrError::Config(format!("Failed to create HTTP client: {e}")))?;

        let endpoint = Url::parse(endpoint)
            .map_err(|e| AutoPrError::Config(format!("Invalid API endpoint: {e}")))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AutoPrError::Config(format!(
                "API endpoint must use http or https: {endpoint}"
            )));
        }

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Converts an unsuccessful response into the matching error.
///
/// 429 responses become [`AutoPrError::RateLimited`]; anything else becomes
/// [`AutoPrError::Api`] with the server's `message` or `error` field when present.
pub(super) async fn failure(response: Response) -> AutoPrError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    debug!("Request failed with status {status}: {body}");

    if let Some(notice) = interpret(status, &body) {
        return AutoPrError::RateLimited(notice);
    }

    let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .unwrap_or_else(|| if body.is_empty() { format!("HTTP {status}") } else { body });

    AutoPrError::Api { status, message }
}
