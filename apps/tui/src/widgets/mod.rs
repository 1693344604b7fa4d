//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use shelfpage_shared::StatusLine;

/// Bottom status bar; error statuses are shown in red.
pub(crate) fn status_bar(status: &StatusLine) -> Paragraph<'_> {
    let fg = if status.is_error() {
        Color::Red
    } else {
        Color::White
    };

    Paragraph::new(format!(" {}", status.text))
        .style(Style::default().bg(Color::DarkGray).fg(fg))
}

/// Star row for a 0-5 rating, e.g. `★★★☆☆`.
pub(crate) fn star_row(filled: u8) -> String {
    let filled = filled.min(5) as usize;
    let mut row = String::new();
    for _ in 0..filled {
        row.push('★');
    }
    for _ in filled..5 {
        row.push('☆');
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_row_renders_five_slots() {
        assert_eq!(star_row(0), "☆☆☆☆☆");
        assert_eq!(star_row(3), "★★★☆☆");
        assert_eq!(star_row(5), "★★★★★");
        assert_eq!(star_row(9), "★★★★★");
    }
}
