//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::ui::panes::{
    self, MachineRenderData, SourceMarker, SourceScrollState, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Tape,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> tape)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tape,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Tape => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter instance, already run with history recording
    pub interpreter: Interpreter,

    /// The raw source code being replayed (comments included)
    pub source_code: String,

    /// Error that stopped the run, if any
    pub run_error: Option<RuntimeError>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub tape_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Interval between steps in play mode
    const PLAY_INTERVAL: Duration = Duration::from_millis(250);

    /// Create a new app with the given interpreter and source code
    pub fn new(interpreter: Interpreter, source_code: String, run_error: Option<RuntimeError>) -> Self {
        let status_message = match &run_error {
            Some(_) => String::from("Run stopped with an error; replaying partial history"),
            None => String::from("Ready!"),
        };

        App {
            interpreter,
            source_code,
            run_error,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None,
            },
            tape_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Self::PLAY_INTERVAL {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn at_end(&self) -> bool {
        self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots()
    }

    /// Where to point in the source: the error location at the end of a
    /// failed run, otherwise the block that just finished
    fn source_marker(&self) -> Option<SourceMarker> {
        if self.at_end() {
            if let Some(location) = self.run_error.as_ref().and_then(RuntimeError::location) {
                return Some(SourceMarker {
                    line: location.line,
                    column: location.column,
                    is_error: true,
                });
            }
        }
        self.interpreter.current_point().map(|point| SourceMarker {
            line: point.location.line,
            column: point.location.column,
            is_error: false,
        })
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tape (top) | Machine (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(columns[1]);

        let marker = self.source_marker();
        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            marker,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.visible_output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_tape_pane(
            frame,
            right_rows[0],
            self.interpreter.tape(),
            self.focused_pane == FocusedPane::Tape,
            &mut self.tape_scroll,
        );

        let error_message = match &self.run_error {
            Some(err) if self.at_end() => Some(err.to_string()),
            _ => None,
        };
        let point = self.interpreter.current_point();
        panes::render_machine_pane(
            frame,
            right_rows[1],
            MachineRenderData {
                state: self.interpreter.state(),
                point,
                block_hits: point.and_then(|p| self.interpreter.block_hits().get(&p.block).copied()),
                error: error_message.as_deref(),
            },
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.interpreter.history_position(),
                total_steps: self.interpreter.total_snapshots(),
                instruction_counter: self.interpreter.instruction_counter(),
                pointer: self.interpreter.pointer(),
                depth: point.map(|p| p.depth),
                has_error: self.run_error.is_some(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n)
                    .take_while(|_| self.interpreter.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.output_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Tape => {
                    self.tape_scroll = self.tape_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Tape => {
                    self.tape_scroll = self.tape_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Self::PLAY_INTERVAL)
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let result = self.interpreter.jump_to_end();
                self.report("Jumped to end", result);
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let result = self.interpreter.rewind_to_start();
                self.report("Jumped to start", result);
            }
            _ => {}
        }
    }

    fn step_forward(&mut self) {
        let result = self.interpreter.step_forward();
        self.report("Stepped forward", result);
    }

    fn step_backward(&mut self) {
        let result = self.interpreter.step_backward();
        self.report("Stepped backward", result);
    }

    /// Update the status bar after a history operation
    fn report(&mut self, success: &str, result: Result<(), RuntimeError>) {
        match result {
            Ok(()) => {
                self.status_message = success.to_string();
                // Auto-scroll output to bottom
                self.output_scroll = usize::MAX;
            }
            Err(RuntimeError::HistoryOperationFailed { message }) => {
                self.status_message = message;
            }
            Err(e) => {
                debug!(error = %e, "history operation failed");
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::interpreter::io::ScriptedInput;
    use crossterm::event::KeyModifiers;

    fn app(source: &str) -> App {
        let config = MachineConfig::default().with_history(1024 * 1024);
        let program = crate::load(source, &config).expect("Parsing failed");
        let mut interpreter = Interpreter::new(program, config)
            .with_input(ScriptedInput::new(""))
            .with_output(io::sink());
        let run_error = interpreter.run().err();
        interpreter.rewind_to_start().unwrap();
        App::new(interpreter, source.to_string(), run_error)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_and_backspace_jump_through_history() {
        let mut app = app("(< ++++++++ . >)(< >)(< >)");
        assert_eq!(app.interpreter.history_position(), 0);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.interpreter.history_position(), 3);
        assert_eq!(app.interpreter.visible_output(), "$");
        assert_eq!(app.status_message, "Jumped to end");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.interpreter.history_position(), 0);
        assert_eq!(app.interpreter.visible_output(), "");
        assert_eq!(app.status_message, "Jumped to start");
    }

    #[test]
    fn test_arrows_and_digits_step() {
        let mut app = app("(< >)(< >)(< >)");

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.interpreter.history_position(), 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.interpreter.history_position(), 1);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.history_position(), 3);

        // Past the end the position stays put and the status explains why
        press(&mut app, KeyCode::Right);
        assert_eq!(app.interpreter.history_position(), 3);
        assert!(app.status_message.contains("execution finished"));
    }

    #[test]
    fn test_error_marker_at_end_of_failed_run() {
        let mut app = app("(< >)\n(< # . >)");
        assert!(app.run_error.is_some());
        // Nothing has run yet at the first snapshot
        assert!(app.source_marker().is_none());

        press(&mut app, KeyCode::Enter);
        let marker = app.source_marker().expect("marker at error");
        assert!(marker.is_error);
        assert_eq!((marker.line, marker.column), (2, 6));
    }

    #[test]
    fn test_focus_cycles_and_quit() {
        let mut app = app("(< >)");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Output);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
