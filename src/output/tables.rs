use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::report::StageReport;
use crate::tracker::StageState;

use super::styling::Tone;

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn stage_state_cell(state: StageState) -> Cell {
    let text = match state {
        StageState::Completed => "✓ done",
        StageState::Current => "● current",
        StageState::Pending => "○ pending",
    };
    Cell::new(text).fg(Tone::for_stage(state).table_color())
}

/// One row per pipeline stage, numbered in pipeline order.
pub fn stage_table(stages: &[StageReport]) -> Table {
    let mut table = create_table();
    table.set_header(
        ["#", "Stage", "State"]
            .into_iter()
            .map(|title| Cell::new(title).fg(Tone::Heading.table_color())),
    );

    for (index, stage) in stages.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&stage.label),
            stage_state_cell(stage.state),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_table_lists_every_stage() {
        let stages = vec![
            StageReport {
                id: "pending".to_string(),
                label: "Initializing".to_string(),
                state: StageState::Completed,
            },
            StageReport {
                id: "validating".to_string(),
                label: "Validating Prompt".to_string(),
                state: StageState::Current,
            },
        ];

        let rendered = stage_table(&stages).to_string();

        assert!(rendered.contains("Initializing"));
        assert!(rendered.contains("Validating Prompt"));
        assert!(rendered.contains("current"));
        assert!(rendered.contains("done"));
    }
}
