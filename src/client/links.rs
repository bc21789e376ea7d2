use url::Url;

use crate::error::{AutoPrError, Result};
use crate::tracker::JobId;

/// Derives the status URL of a job from the submission endpoint.
///
/// The last path segment of the endpoint is replaced by `status/{job_id}`,
/// e.g. `https://api.example.com/prod/process` becomes
/// `https://api.example.com/prod/status/{job_id}`. An endpoint without a
/// path gets `status/{job_id}` appended.
///
/// # Errors
///
/// Returns an error if the endpoint cannot carry path segments.
pub fn status_url(endpoint: &Url, job_id: &JobId) -> Result<Url> {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            AutoPrError::Config(format!("Endpoint cannot be used as a base URL: {endpoint}"))
        })?;
        segments.pop_if_empty().pop();
        segments.push("status").push(job_id.as_str());
    }

    Ok(url)
}
