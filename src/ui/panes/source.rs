//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source code pane, which displays the AnnoyScript
//! program being replayed with operator highlighting and execution indicators.
//!
//! # Features
//!
//! - Highlighting for token-pair brackets, arithmetic, movement, I/O and comments
//! - Current block line highlighting, with the block's opening bracket marked
//! - Scroll state management for navigating large files
//! - Line numbering
//!
//! # Rendering
//!
//! Highlighting is a per-character classification; it does not need the
//! parser because every operator is a single character.

use crate::parser::comments::split_lines;
use crate::parser::is_space;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn operator_style(c: char) -> Style {
    match c {
        '(' | ')' | '<' | '>' | '?' => Style::default()
            .fg(DEFAULT_THEME.bracket)
            .add_modifier(Modifier::BOLD),
        '+' | '-' => Style::default().fg(DEFAULT_THEME.arithmetic),
        '^' | 'v' => Style::default().fg(DEFAULT_THEME.movement),
        '.' | ',' => Style::default().fg(DEFAULT_THEME.io),
        '#' => Style::default().fg(DEFAULT_THEME.error),
        c if is_space(c) => Style::default(),
        // Anything else fails at runtime
        _ => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::UNDERLINED),
    }
}

/// Simple syntax highlighting for one source line
fn highlight_source_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();

    for (i, c) in line.char_indices() {
        if c == ';' {
            spans.push(Span::styled(
                &line[i..],
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }
        spans.push(Span::styled(&line[i..i + c.len_utf8()], operator_style(c)));
    }

    Line::from(spans)
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Position of the block being shown, 1-based
#[derive(Debug, Clone, Copy)]
pub struct SourceMarker {
    pub line: usize,
    pub column: usize,
    /// The run stopped with an error at this point
    pub is_error: bool,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    marker: Option<SourceMarker>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = split_lines(source_code);
    let total_lines = lines.len();
    let current_line = marker.map_or(0, |m| m.line);

    // Account for borders (2), min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Initialize target_line_row to center if not set, then keep it inside the pane
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Calculate scroll offset to keep current line at target visual row
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);

        if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            scroll_state.offset = scroll_state.offset.min(max_scroll);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let is_error = is_current && marker.is_some_and(|m| m.is_error);

            let (num_style, background) = if is_error {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.error).fg(Color::Black),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let mut content = highlight_source_line(line);

            if is_current {
                let column = marker.map_or(0, |m| m.column);
                for (col, span) in content.spans.iter_mut().enumerate() {
                    span.style = span.style.patch(background);
                    // Mark the opening bracket of the block
                    if col + 1 == column {
                        span.style = span.style.add_modifier(Modifier::REVERSED);
                    }
                }
            }

            let marker_str = if is_current { "▶" } else { " " };
            let mut spans = vec![Span::styled(
                format!("{}{:4} ", marker_str, line_num),
                num_style,
            )];
            spans.extend(content.spans);

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
