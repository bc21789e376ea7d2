use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::tracker::{StageDescriptor, StageProgress, StageRegistry, StageState, StatusSnapshot};

use super::styling::{heading, muted, stage_line, warning};

const SPINNER_TICK: std::time::Duration = std::time::Duration::from_millis(120);

/// Live view of a job's pipeline stages.
///
/// Completed stages are printed once with a check mark; the current stage
/// is shown on a spinner line together with the server's message.
pub struct StageProgressView {
    pb: ProgressBar,
    total: usize,
    printed: usize,
}

impl StageProgressView {
    pub fn start(request_id: &str) -> Self {
        eprintln!(
            "{}  {} {}",
            heading("⚙️"),
            heading("Pipeline").underlined(),
            muted(format!("(request {request_id})"))
        );
        let pb = stage_spinner(warning("Waiting for first status update").to_string());
        Self {
            pb,
            total: 0,
            printed: 0,
        }
    }

    pub fn update(
        &mut self,
        registry: &StageRegistry,
        snapshot: &StatusSnapshot,
        stages: &StageProgress,
    ) {
        self.total = stages.len();

        let completed = stages.completed_count();
        for stage in registry
            .iter()
            .skip(self.printed)
            .take(completed.saturating_sub(self.printed))
        {
            self.pb.println(done_line(stage, self.total));
        }
        self.printed = self.printed.max(completed);

        let Some((index, id)) = stages.current() else {
            self.pb
                .set_message(warning(format!("Status: {}", snapshot.raw_status)).to_string());
            return;
        };

        let label = registry.get(id).map_or(id, |stage| stage.label);
        let mut message = stage_line(
            StageState::Current,
            format!("Stage {}/{}: {label}", index + 1, self.total),
        )
        .to_string();
        if !snapshot.message.is_empty() {
            message.push_str(&format!(" {}", muted(&snapshot.message)));
        }
        self.pb.set_message(message);
    }

    /// Marks every remaining stage done; used once the pull request exists.
    pub fn finish_success(self, registry: &StageRegistry) {
        for stage in registry.iter().skip(self.printed) {
            self.pb.println(done_line(stage, registry.len()));
        }
        self.pb.finish_and_clear();
        eprintln!();
    }

    pub fn abandon(self) {
        self.pb.finish_and_clear();
        eprintln!();
    }
}

fn done_line(stage: &StageDescriptor, total: usize) -> String {
    format!(
        "  {}",
        stage_line(
            StageState::Completed,
            format!("Stage {}/{}: {} ✓", stage.order + 1, total, stage.label)
        )
    )
}

/// Spinner for the current stage; the elapsed time restarts with each view.
fn stage_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner} {elapsed:.dim}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(SPINNER_TICK);
    pb
}
