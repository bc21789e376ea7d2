use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::stages::StageRegistry;

/// Display state of one stage relative to the job's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Completed,
    Current,
    Pending,
}

/// Per-stage states in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageProgress {
    states: IndexMap<&'static str, StageState>,
}

impl StageProgress {
    pub fn state_of(&self, stage_id: &str) -> Option<StageState> {
        self.states.get(stage_id).copied()
    }

    /// Id and position of the stage currently in progress, if the status is a known stage.
    pub fn current(&self) -> Option<(usize, &'static str)> {
        self.states
            .iter()
            .enumerate()
            .find(|(_, (_, state))| **state == StageState::Current)
            .map(|(index, (id, _))| (index, *id))
    }

    pub fn completed_count(&self) -> usize {
        self.count(StageState::Completed)
    }

    pub fn count(&self, state: StageState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, StageState)> + '_ {
        self.states.iter().map(|(id, state)| (*id, *state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}

/// Computes every stage's state from the latest raw status token.
///
/// Stages before the reported one are completed, the reported one is current
/// and the rest are pending. A status that is not a registered stage
/// (including the terminal tokens) leaves every stage pending.
pub fn resolve(registry: &StageRegistry, raw_status: &str) -> StageProgress {
    let current_index = registry.index_of(raw_status);

    let states = registry
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let state = match current_index {
                Some(current) if index < current => StageState::Completed,
                Some(current) if index == current => StageState::Current,
                _ => StageState::Pending,
            };
            (stage.id, state)
        })
        .collect();

    StageProgress { states }
}

/// Every stage completed; the state of the pipeline once the pull request exists.
pub fn complete(registry: &StageRegistry) -> StageProgress {
    let states = registry
        .iter()
        .map(|stage| (stage.id, StageState::Completed))
        .collect();

    StageProgress { states }
}
