use std::fmt::Display;

use comfy_table::Color as TableColor;
use console::{Style, StyledObject};

use crate::tracker::StageState;

/// Visual roles shared by terminal lines and table cells, so a stage or an
/// outcome reads the same wherever it is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Failure,
    Active,
    Value,
    Muted,
    Heading,
    Brand,
}

impl Tone {
    pub fn for_stage(state: StageState) -> Self {
        match state {
            StageState::Completed => Tone::Success,
            StageState::Current => Tone::Active,
            StageState::Pending => Tone::Muted,
        }
    }

    fn style(self) -> Style {
        let base = Style::new();
        match self {
            Tone::Success => base.green().bright(),
            Tone::Warning => base.yellow().bright(),
            Tone::Failure => base.red().bright(),
            Tone::Active => base.blue().bright(),
            Tone::Value => base.cyan(),
            Tone::Muted => base.dim(),
            Tone::Heading => base.bright(),
            Tone::Brand => base.magenta().bold(),
        }
    }

    pub fn table_color(self) -> TableColor {
        match self {
            Tone::Success => TableColor::Green,
            Tone::Warning => TableColor::Yellow,
            Tone::Failure => TableColor::Red,
            Tone::Active => TableColor::Blue,
            Tone::Value | Tone::Heading => TableColor::Cyan,
            Tone::Muted => TableColor::DarkGrey,
            Tone::Brand => TableColor::Magenta,
        }
    }

    pub fn paint(self, text: impl Display) -> StyledObject<String> {
        self.style().apply_to(text.to_string())
    }
}

pub fn success(text: impl Display) -> StyledObject<String> {
    Tone::Success.paint(text)
}

pub fn warning(text: impl Display) -> StyledObject<String> {
    Tone::Warning.paint(text)
}

pub fn failure(text: impl Display) -> StyledObject<String> {
    Tone::Failure.paint(text)
}

/// Identifiers and links the user may want to copy.
pub fn value(text: impl Display) -> StyledObject<String> {
    Tone::Value.paint(text)
}

pub fn muted(text: impl Display) -> StyledObject<String> {
    Tone::Muted.paint(text)
}

pub fn heading(text: impl Display) -> StyledObject<String> {
    Tone::Heading.paint(text)
}

pub fn brand(text: impl Display) -> StyledObject<String> {
    Tone::Brand.paint(text)
}

pub fn stage_line(state: StageState, text: impl Display) -> StyledObject<String> {
    Tone::for_stage(state).paint(text)
}
