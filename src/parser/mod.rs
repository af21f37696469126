//! AnnoyScript source parser
//!
//! This module transforms source text into a tree of token pairs:
//! - [`comments`]: line comment removal (applied once, before parsing)
//! - [`parse`]: recursive descent over `(< … >)` / `(? … ?)` blocks
//! - [`ast`]: block tree definitions and the printer (`Display`)
//!
//! # Grammar
//!
//! ```text
//! program := (whitespace | block)*
//! block   := '(' '<' body '>' ')'
//!          | '(' '?' body '?' ')'
//! body    := (char | block)*
//! ```
//!
//! Nesting depth is not stored in the tree; the interpreter derives it while
//! descending.

pub mod ast;
pub mod comments;
pub mod parse;

pub use parse::{parse, ParseError, Parser};

/// Whitespace between blocks and inside literals
///
/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F.
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_space() {
        let spaces = [
            ' ', '\t', '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1f}', '\u{85}', '\u{a0}',
            '\u{3000}',
        ];
        for c in spaces {
            assert!(is_space(c), "{:?}", c);
        }
        for c in ['+', '\u{1b}', '\u{0}', '\u{200b}'] {
            assert!(!is_space(c), "{:?}", c);
        }
    }
}
