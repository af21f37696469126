//! AnnoyScript execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), block execution and history replay
//! - [`literal`]: operator execution and depth polarity
//! - [`io`]: character input for `,`
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The interpreter walks the block tree depth-first. Each finished block is one
//! instruction: the counter goes up by one and the pointer moves once. When
//! history is enabled a snapshot is taken after every instruction to enable
//! time-travel debugging.

pub mod engine;
pub mod errors;
pub mod io;
pub mod literal;
