//! Block parser
//!
//! This module provides the [`Parser`] struct, its error type and the [`parse`]
//! convenience entry point.
//!
//! # Parser Architecture
//!
//! AnnoyScript has no separate token stream: the body of a token pair is raw
//! operator text, and only three things are structural:
//! - `(<` / `(?` opening a block,
//! - the two-character closer of the *current* block (`>)` or `?)`),
//! - whitespace between top-level blocks.
//!
//! The parser therefore scans the source character by character and descends
//! recursively into nested blocks. Nesting depth is bounded by
//! [`Parser::with_max_depth`] so that pathological input yields a
//! [`ParseError::NestingTooDeep`] instead of exhausting the call stack.

use crate::config::DEFAULT_MAX_NESTING_DEPTH;
use crate::parser::ast::*;
use crate::parser::is_space;
use thiserror::Error;
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected character at top level: '{found}' at index {}", .location.index)]
    UnexpectedTopLevel {
        found: char,
        location: SourceLocation,
    },

    #[error("Unexpected end of input after '(' at index {}", .location.index)]
    UnexpectedEof { location: SourceLocation },

    #[error(
        "Invalid token after '(' at index {}: expected '<' or '?', found '{found}'",
        .location.index
    )]
    InvalidBlockOpener {
        found: char,
        location: SourceLocation,
    },

    #[error(
        "Missing closing token '{}' for block starting at index {} ({})",
        .kind.closer(),
        .start.index,
        .start
    )]
    UnterminatedBlock {
        kind: BlockKind,
        start: SourceLocation,
    },

    #[error("Blocks nested deeper than {limit} levels at index {}", .location.index)]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedTopLevel { location, .. }
            | ParseError::UnexpectedEof { location }
            | ParseError::InvalidBlockOpener { location, .. }
            | ParseError::NestingTooDeep { location, .. } => *location,
            ParseError::UnterminatedBlock { start, .. } => *start,
        }
    }
}

/// Parse comment-stripped source with the default nesting limit
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source).parse_program()
}

/// Recursive descent parser for token pairs
pub struct Parser {
    chars: Vec<char>,
    /// Line and column of every character, precomputed for error reporting
    positions: Vec<(usize, usize)>,
    position: usize,
    next_id: NodeId,
    max_depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut positions = Vec::with_capacity(chars.len());
        let (mut line, mut column) = (1, 1);
        for &c in &chars {
            positions.push((line, column));
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self {
            chars,
            positions,
            position: 0,
            next_id: 0,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Override the maximum block nesting depth (top-level blocks are depth 0)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the entire program (top-level blocks)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();

        while let Some(c) = self.peek() {
            if is_space(c) {
                self.position += 1;
                continue;
            }
            if c != '(' {
                return Err(ParseError::UnexpectedTopLevel {
                    found: c,
                    location: self.location_at(self.position),
                });
            }
            let block = self.parse_block(0)?;
            program.blocks.push(block);
        }

        debug!(
            blocks = program.blocks.len(),
            nodes = self.next_id,
            "parsed program"
        );
        Ok(program)
    }

    /// Parse one token pair starting at the current `(`
    ///
    /// On return the position is just past the block's closing marker.
    fn parse_block(&mut self, depth: usize) -> Result<Block, ParseError> {
        let start = self.location_at(self.position);

        if depth > self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                location: start,
            });
        }

        // consume '('
        self.position += 1;

        let kind = match self.peek() {
            None => {
                return Err(ParseError::UnexpectedEof {
                    location: self.location_at(self.position),
                })
            }
            Some(c) => BlockKind::from_opener(c).ok_or_else(|| {
                ParseError::InvalidBlockOpener {
                    found: c,
                    location: self.location_at(self.position),
                }
            })?,
        };
        self.position += 1;

        let id = self.next_id;
        self.next_id += 1;
        trace!(id, ?kind, depth, index = start.index, "entering block");

        let closer: Vec<char> = kind.closer().chars().collect();
        let mut items = Vec::new();
        let mut buffer = String::new();
        let mut buffer_start = self.position;

        while let Some(c) = self.peek() {
            if self.chars[self.position..].starts_with(&closer) {
                self.flush_literal(&mut buffer, buffer_start, &mut items);
                self.position += closer.len();
                return Ok(Block {
                    id,
                    kind,
                    items,
                    location: start,
                });
            }

            if c == '(' && self.peek_at(1).and_then(BlockKind::from_opener).is_some() {
                self.flush_literal(&mut buffer, buffer_start, &mut items);
                let nested = self.parse_block(depth + 1)?;
                items.push(Item::Block(nested));
                buffer_start = self.position;
                continue;
            }

            if buffer.is_empty() {
                buffer_start = self.position;
            }
            buffer.push(c);
            self.position += 1;
        }

        Err(ParseError::UnterminatedBlock { kind, start })
    }

    fn flush_literal(&self, buffer: &mut String, start: usize, items: &mut Vec<Item>) {
        if buffer.is_empty() {
            return;
        }
        items.push(Item::Literal(Literal {
            text: std::mem::take(buffer),
            location: self.location_at(start),
        }));
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn location_at(&self, index: usize) -> SourceLocation {
        match self.positions.get(index) {
            Some(&(line, column)) => SourceLocation::new(index, line, column),
            // End of input: one past the last character
            None => {
                let (line, column) = match self.chars.last() {
                    Some('\n') => (self.positions.last().map_or(1, |p| p.0 + 1), 1),
                    Some(_) => self.positions.last().map_or((1, 1), |p| (p.0, p.1 + 1)),
                    None => (1, 1),
                };
                SourceLocation::new(index, line, column)
            }
        }
    }
}
