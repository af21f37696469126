//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility for maintainability.
//!
//! # Pane Modules
//!
//! - [`source`]: Source display with operator highlighting and current block indicator
//! - [`tape`]: The 128-cell tape as a grid with the pointer highlighted
//! - [`machine`]: Instruction counter, pointer and the block that just finished
//! - [`terminal`]: Output written by `.`
//! - [`status`]: Status bar with keybindings and execution state
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*` function that borrows what
//! it draws; scroll offsets are owned by [`App`](crate::ui::App).

pub mod machine;
pub mod source;
pub mod status;
pub mod tape;
pub mod terminal;

// Re-export render functions for convenience
pub use machine::{render_machine_pane, MachineRenderData};
pub use source::{render_source_pane, SourceMarker, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tape::render_tape_pane;
pub use terminal::render_terminal_pane;
