use log::warn;
use serde::Serialize;

use super::snapshot::StatusSnapshot;

const STATUS_COMPLETED: &str = "completed";
const STATUS_REJECTED: &str = "rejected";
const STATUS_ERROR: &str = "error";

/// Classification of a job's latest status report.
///
/// Every variant except `InProgress` is terminal and ends polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    /// The pull request was opened; carries its URL
    Success(String),
    /// The prompt was judged unusable; the job never did meaningful work
    Rejected(Option<String>),
    /// The job failed after starting
    Error(Option<String>),
    /// The status endpoint could not be queried
    TransportError(String),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "in progress",
            Self::Success(_) => "success",
            Self::Rejected(_) => "rejected",
            Self::Error(_) => "error",
            Self::TransportError(_) => "transport error",
        }
    }
}

/// Derives the outcome of a status report.
///
/// A `completed` status without a pull request URL is a server contract
/// violation; it is logged and treated as still in progress.
pub fn classify(snapshot: &StatusSnapshot) -> Outcome {
    match snapshot.raw_status.as_str() {
        STATUS_COMPLETED => match &snapshot.artifact_url {
            Some(url) => Outcome::Success(url.clone()),
            None => {
                warn!(
                    "Job {} reported completed without a pull request URL; still waiting",
                    snapshot.job_id
                );
                Outcome::InProgress
            }
        },
        STATUS_REJECTED => Outcome::Rejected(snapshot.diagnostic.clone()),
        STATUS_ERROR => Outcome::Error(snapshot.diagnostic.clone()),
        _ => Outcome::InProgress,
    }
}
