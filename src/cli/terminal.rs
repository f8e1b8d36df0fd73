//! How output is styled and laid out for the terminal it lands on.

use owo_colors::OwoColorize;

/// Listings switch to the compact layout below this many columns.
const COMPACT_BELOW: u16 = 60;

/// The style of a status line printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A change was saved.
    Success,
    /// Secondary information.
    Muted,
}

impl Tone {
    /// Styles `text`, or leaves it alone when stdout takes no colour.
    pub fn paint(self, text: &str) -> String {
        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            return text.to_string();
        }
        match self {
            Self::Success => text.green().to_string(),
            Self::Muted => text.dimmed().to_string(),
        }
    }
}

/// Which columns a table listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Title, room, category, priority, owner and date.
    Full,
    /// Title, room, category and priority.
    Compact,
}

impl Layout {
    /// Picks the layout for the width of the attached terminal. Output that
    /// is not going to a terminal gets the full layout.
    pub fn detect() -> Self {
        Self::for_width(terminal_size::terminal_size().map(|(width, _)| width.0))
    }

    const fn for_width(width: Option<u16>) -> Self {
        match width {
            Some(columns) if columns < COMPACT_BELOW => Self::Compact,
            _ => Self::Full,
        }
    }
}
