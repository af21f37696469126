//! Program output pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Split output into display rows of at most `width` characters
fn wrap_output(output: &str, width: usize) -> Vec<&str> {
    let mut rows = Vec::new();
    let mut rest = output;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(width.max(1))
            .map_or(rest.len(), |(i, _)| i);
        let (row, tail) = rest.split_at(split);
        rows.push(row);
        rest = tail;
    }
    rows
}

/// Render the output written by `.` up to the current step
///
/// The program has no newline operator, so output is wrapped to the pane
/// width instead of split on line breaks.
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &str,
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

    let block = Block::default()
        .title(format!(" Output ({} chars) ", output.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    // Borders and left padding
    let width = area.width.saturating_sub(3).max(1) as usize;
    let lines = wrap_output(output, width);

    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_output() {
        assert_eq!(wrap_output("Hello, tape!", 5), vec!["Hello", ", tap", "e!"]);
        assert_eq!(wrap_output("abc", 10), vec!["abc"]);
        assert!(wrap_output("", 4).is_empty());
    }
}
