use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tracker::{complete, Completion, Outcome, StageRegistry, StageState};

/// Final record of a tracking session, exported as JSON with `--output`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingReport {
    pub request_id: String,
    pub repository: String,
    pub outcome: Outcome,
    /// Last raw status reported by the server
    pub status: Option<String>,
    pub message: Option<String>,
    pub stages: Vec<StageReport>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub id: String,
    pub label: String,
    pub state: StageState,
}

impl TrackingReport {
    /// Builds the report for a finished job.
    ///
    /// A successful job has every stage completed; otherwise stages show how
    /// far the job got before it stopped. `repository` is used when the
    /// server never reported one.
    pub fn new(completion: &Completion, registry: &StageRegistry, repository: &str) -> Self {
        let snapshot = completion.snapshot.as_ref();
        let status = snapshot.map(|s| s.raw_status.clone());
        let progress = if completion.outcome.is_success() {
            complete(registry)
        } else {
            completion.stages.clone()
        };

        let stages = registry
            .iter()
            .map(|stage| StageReport {
                id: stage.id.to_string(),
                label: stage.label.to_string(),
                state: progress.state_of(stage.id).unwrap_or(StageState::Pending),
            })
            .collect();

        let repository = snapshot
            .map(|s| s.repository.as_str())
            .filter(|r| !r.is_empty())
            .unwrap_or(repository)
            .to_string();

        Self {
            request_id: completion.job_id.to_string(),
            repository,
            outcome: completion.outcome.clone(),
            status,
            message: snapshot.map(|s| s.message.clone()).filter(|m| !m.is_empty()),
            stages,
            finished_at: Utc::now(),
        }
    }
}
