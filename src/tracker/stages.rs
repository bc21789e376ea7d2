/// One named phase of the remote job's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Status token the server reports while the job is in this stage
    pub id: &'static str,
    /// Human readable label
    pub label: &'static str,
    /// Position in the pipeline (0-based)
    pub order: usize,
}

const DEFAULT_STAGES: [(&str, &str); 8] = [
    ("pending", "Initializing"),
    ("validating", "Validating Prompt"),
    ("forking", "Forking Repository"),
    ("cloning", "Cloning Fork"),
    ("analyzing", "Analyzing Code"),
    ("modifying", "Generating Modifications"),
    ("committing", "Committing Changes"),
    ("creating_pr", "Creating Pull Request"),
];

/// Ordered, immutable catalog of the known pipeline stages.
///
/// Order reflects the temporal precedence of the stages in the remote job,
/// so adding a stage only requires inserting it at the right position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRegistry {
    stages: Vec<StageDescriptor>,
}

impl Default for StageRegistry {
    fn default() -> Self {
        let stages = DEFAULT_STAGES
            .iter()
            .enumerate()
            .map(|(order, &(id, label))| StageDescriptor { id, label, order })
            .collect();
        Self { stages }
    }
}

impl StageRegistry {
    /// Builds a registry from `(id, label)` pairs in pipeline order.
    #[cfg(test)]
    pub fn new(stages: &[(&'static str, &'static str)]) -> crate::error::Result<Self> {
        use crate::error::AutoPrError;
        use std::collections::HashSet;

        if stages.is_empty() {
            return Err(AutoPrError::Config(
                "Stage registry needs at least one stage".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (id, _) in stages {
            if !seen.insert(*id) {
                return Err(AutoPrError::Config(format!("Duplicate stage id: {id}")));
            }
        }

        let stages = stages
            .iter()
            .enumerate()
            .map(|(order, &(id, label))| StageDescriptor { id, label, order })
            .collect();

        Ok(Self { stages })
    }

    /// Position of the stage whose id equals `status`, if any.
    pub fn index_of(&self, status: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.id == status)
    }

    pub fn get(&self, id: &str) -> Option<&StageDescriptor> {
        self.index_of(id).map(|index| &self.stages[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageDescriptor> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }
}
