//! # Introduction
//!
//! AnnoyScript is an esoteric language made of nested token pairs. A
//! `(< … >)` block always runs; a `(? … ?)` block runs only when the cell
//! under the pointer is non-zero. The meaning of `+ - ^ v` flips with the
//! parity of the nesting depth, and every finished block moves the pointer.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → strip comments → Parser → Program → Interpreter → output / Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: removes `;` comments and builds the block tree.
//! 2. [`interpreter`]: walks the tree, mutating the [`memory::MachineState`].
//! 3. [`memory`]: 128 wrapping cells, the pointer and the instruction counter.
//! 4. [`snapshot`]: per-instruction history with a memory limit, plus the
//!    [`snapshot::Transcript`] of everything written.
//! 5. [`ui`]: ratatui-based time-travel viewer; not part of the stable
//!    library API.
//!
//! ## Operators
//!
//! Runs of `+`/`-` add or subtract the triangular number of the run length,
//! `^`/`v` adjust the block's pointer override, `.` prints, `,` reads,
//! `#` clears the cell. Whitespace is ignored.

pub mod config;
pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;

pub use config::MachineConfig;
pub use error::{Error, Result};
pub use interpreter::engine::Interpreter;
pub use parser::ast::Program;

use interpreter::io::ScriptedInput;
use memory::MachineState;
use parser::{comments::strip_comments, Parser};

/// Strip comments from raw source and parse it
pub fn load(source: &str, config: &MachineConfig) -> Result<Program> {
    let cleaned = strip_comments(source);
    let program = Parser::new(&cleaned)
        .with_max_depth(config.max_nesting_depth)
        .parse_program()?;
    Ok(program)
}

/// Result of a completed in-memory run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub state: MachineState,
    pub output: String,
}

/// Load and run raw source with `input` as the whole input stream
///
/// Output is captured rather than written to stdout.
pub fn interpret(source: &str, input: &str) -> Result<Run> {
    let config = MachineConfig::default();
    let program = load(source, &config)?;
    let mut interpreter = Interpreter::new(program, config)
        .with_input(ScriptedInput::new(input))
        .with_output(std::io::sink());
    interpreter.run()?;

    Ok(Run {
        state: *interpreter.state(),
        output: interpreter.transcript().text().to_string(),
    })
}
