//! Tape pane rendering
//!
//! Shows all 128 cells as a grid of [`CELLS_PER_ROW`] columns. The cell under
//! the pointer is highlighted, zero cells are dimmed, and each row ends with
//! the printable characters of its cells (`·` for anything `.` would reject).

use crate::config::{PRINTABLE, TAPE_LEN};
use crate::memory::tape::Tape;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const CELLS_PER_ROW: usize = 16;

/// Character shown for a cell value in the ASCII column
fn cell_glyph(value: u8) -> char {
    if PRINTABLE.contains(&value) {
        value as char
    } else {
        '·'
    }
}

fn tape_row(tape: &Tape, row: usize) -> Line<'static> {
    let start = row * CELLS_PER_ROW;
    let end = (start + CELLS_PER_ROW).min(TAPE_LEN);
    let cells = &tape.cells()[start..end];

    let mut spans = vec![Span::styled(
        format!("{:3} │", start),
        Style::default().fg(DEFAULT_THEME.comment),
    )];

    for (offset, &value) in cells.iter().enumerate() {
        let index = start + offset;
        let style = if index == tape.pointer() {
            Style::default()
                .bg(DEFAULT_THEME.pointer_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if value == 0 {
            Style::default().fg(DEFAULT_THEME.zero_cell)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("{:3}", value), style));
    }

    let ascii: String = cells.iter().map(|&v| cell_glyph(v)).collect();
    spans.push(Span::styled(
        format!(" │ {}", ascii),
        Style::default().fg(DEFAULT_THEME.secondary),
    ));

    Line::from(spans)
}

/// Render the tape pane
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    tape: &Tape,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = format!(" Tape (ptr {} = {}) ", tape.pointer(), tape.current());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_rows = TAPE_LEN.div_ceil(CELLS_PER_ROW);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Clamp scroll offset only if content exceeds visible area
    if total_rows > visible_height {
        let max_scroll = total_rows - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let lines: Vec<Line> = (0..total_rows)
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|row| tape_row(tape, row))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_glyph() {
        assert_eq!(cell_glyph(b'A'), 'A');
        assert_eq!(cell_glyph(b' '), ' ');
        assert_eq!(cell_glyph(0), '·');
        assert_eq!(cell_glyph(127), '·');
    }

    #[test]
    fn test_row_marks_ascii_column() {
        let mut tape = Tape::new();
        tape.set_current(b'$');
        let line = tape_row(&tape, 0);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("  0 │  36"));
        assert!(text.ends_with(&format!("${}", "·".repeat(15))));
    }
}
