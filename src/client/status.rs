use futures::future::BoxFuture;
use log::debug;

use crate::error::Result;
use crate::tracker::{JobId, StatusSnapshot, StatusSource};

use super::core::{failure, ApiClient};
use super::links::status_url;
use super::types::StatusResponse;

impl ApiClient {
    /// Fetches the latest status report of a job.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, on an unsuccessful status
    /// (429 maps to [`crate::error::AutoPrError::RateLimited`]) or on a malformed body.
    pub async fn fetch_status(&self, job_id: &JobId) -> Result<StatusSnapshot> {
        let url = status_url(&self.endpoint, job_id)?;
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        let body: StatusResponse = response.json().await?;
        Ok(body.into())
    }
}

impl StatusSource for ApiClient {
    fn fetch_status<'a>(&'a self, job_id: &'a JobId) -> BoxFuture<'a, Result<StatusSnapshot>> {
        Box::pin(ApiClient::fetch_status(self, job_id))
    }
}
