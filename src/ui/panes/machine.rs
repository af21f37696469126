//! Machine state pane: counter, pointer, current block and its hit count

use crate::memory::MachineState;
use crate::parser::ast::BlockKind;
use crate::snapshot::ExecutionPoint;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Data needed to render the machine pane
pub struct MachineRenderData<'a> {
    pub state: &'a MachineState,
    pub point: Option<&'a ExecutionPoint>,
    /// Total executions of the current block over the whole run
    pub block_hits: Option<u64>,
    pub error: Option<&'a str>,
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<13}", label),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

/// Render the machine state pane
pub fn render_machine_pane(frame: &mut Frame, area: Rect, data: MachineRenderData) {
    let block = Block::default()
        .title(" Machine ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let state = data.state;
    let mut lines = vec![
        field("instruction", state.instruction_counter.to_string()),
        field("pointer", state.pointer().to_string()),
        field("cell", state.tape.current().to_string()),
    ];

    match data.point {
        Some(point) => {
            let kind = match point.kind {
                BlockKind::Normal => "normal (< >)",
                BlockKind::Conditional => "conditional (? ?)",
            };
            lines.push(Line::default());
            lines.push(field("last block", format!("#{} {}", point.block, kind)));
            lines.push(field(
                "at",
                format!("line {}, col {}", point.location.line, point.location.column),
            ));
            lines.push(field(
                "depth",
                format!(
                    "{} ({})",
                    point.depth,
                    if point.depth % 2 == 0 { "even" } else { "odd" }
                ),
            ));
            if point.skipped {
                lines.push(Line::from(Span::styled(
                    "guard cell was zero: body skipped",
                    Style::default().fg(DEFAULT_THEME.secondary),
                )));
            }
            if let Some(hits) = data.block_hits {
                lines.push(field("executions", hits.to_string()));
            }
        }
        None => {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "before the first block",
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }
    }

    if let Some(message) = data.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
