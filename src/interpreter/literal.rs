//! Literal execution and depth-dependent operator polarity
//!
//! Every literal runs at the depth of its enclosing block. Even depths use the
//! natural meaning of `+ - ^ v`; odd depths invert all four. The inversion is
//! captured by [`signed_effect`], a pure function of the operator and the
//! depth [`Parity`], so the interpreter never keeps polarity in mutable state.
//!
//! | operator | even depth        | odd depth         |
//! |----------|-------------------|-------------------|
//! | `+` × N  | cell += N(N+1)/2  | cell -= N(N+1)/2  |
//! | `-` × N  | cell -= N(N+1)/2  | cell += N(N+1)/2  |
//! | `^`      | override += 1     | override -= 1     |
//! | `v`      | override -= 1     | override += 1     |

use crate::config::PRINTABLE;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Literal, SourceLocation};
use crate::parser::is_space;
use std::io::Write;
use tracing::trace;

/// Parity of a block's nesting depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(depth: usize) -> Self {
        if depth % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn sign(self) -> i64 {
        match self {
            Parity::Even => 1,
            Parity::Odd => -1,
        }
    }
}

/// Operators whose meaning depends on depth parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarized {
    Plus,
    Minus,
    Up,
    Down,
}

impl Polarized {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Polarized::Plus),
            '-' => Some(Polarized::Minus),
            '^' => Some(Polarized::Up),
            'v' => Some(Polarized::Down),
            _ => None,
        }
    }
}

/// Unit effect of a polarized operator at the given parity
///
/// For `+`/`-` this is the sign applied to a run's triangular sum; for
/// `^`/`v` it is the pointer override contribution.
pub fn signed_effect(op: Polarized, parity: Parity) -> i64 {
    let natural = match op {
        Polarized::Plus | Polarized::Up => 1,
        Polarized::Minus | Polarized::Down => -1,
    };
    natural * parity.sign()
}

/// `N(N+1)/2` reduced modulo 256
///
/// Only the residue matters because cells wrap, and reducing keeps very long
/// runs from overflowing.
pub fn triangular_mod_256(n: usize) -> i64 {
    let n = n as u128;
    ((n * (n + 1) / 2) % 256) as i64
}

/// Tracks the source position of each character while scanning a literal
struct Cursor {
    location: SourceLocation,
}

impl Cursor {
    fn advance(&mut self, c: char) {
        self.location.index += 1;
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
    }
}

impl Interpreter {
    /// Execute one literal, returning the pointer override it produced
    ///
    /// The override is not applied here; the enclosing block sums it with its
    /// other literals and moves the pointer once it has finished.
    pub(crate) fn execute_literal(
        &mut self,
        literal: &Literal,
        depth: usize,
    ) -> Result<i64, RuntimeError> {
        let parity = Parity::of(depth);
        let chars: Vec<char> = literal.text.chars().collect();
        let mut cursor = Cursor {
            location: literal.location,
        };
        let mut pointer_override = 0i64;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let location = cursor.location;

            match c {
                '+' | '-' => {
                    let run = chars[i..].iter().take_while(|&&next| next == c).count();
                    let op = if c == '+' {
                        Polarized::Plus
                    } else {
                        Polarized::Minus
                    };
                    let amount = signed_effect(op, parity) * triangular_mod_256(run);
                    self.state.tape.add_to_current(amount);
                    trace!(op = %c, run, amount, cell = self.state.tape.current(), "arithmetic run");
                    for _ in 0..run {
                        cursor.advance(c);
                    }
                    i += run;
                    continue;
                }
                '^' | 'v' => {
                    if let Some(op) = Polarized::from_char(c) {
                        pointer_override += signed_effect(op, parity);
                    }
                }
                '.' => {
                    let value = self.state.tape.current();
                    if !PRINTABLE.contains(&value) {
                        return Err(RuntimeError::DisplayOfDismay {
                            cell: self.state.tape.pointer(),
                            value,
                            location,
                        });
                    }
                    self.emit(value as char)?;
                }
                ',' => {
                    let Some(input) = self.input.read_char()? else {
                        return Err(RuntimeError::InputExhausted { location });
                    };
                    self.state.tape.set_current((input as u32 % 256) as u8);
                }
                '#' => self.state.tape.set_current(0),
                c if is_space(c) => {}
                other => {
                    return Err(RuntimeError::UnknownOperator {
                        symbol: other,
                        depth,
                        location,
                    });
                }
            }

            cursor.advance(c);
            i += 1;
        }

        Ok(pointer_override)
    }

    /// Write one character to the output sink and the transcript
    fn emit(&mut self, c: char) -> Result<(), RuntimeError> {
        let mut buf = [0u8; 4];
        self.output.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        self.output.flush()?;
        self.transcript.push(c);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_of_depth() {
        assert_eq!(Parity::of(0), Parity::Even);
        assert_eq!(Parity::of(1), Parity::Odd);
        assert_eq!(Parity::of(2), Parity::Even);
        assert_eq!(Parity::of(7), Parity::Odd);
    }

    #[test]
    fn test_effects_even_depth() {
        assert_eq!(signed_effect(Polarized::Plus, Parity::Even), 1);
        assert_eq!(signed_effect(Polarized::Minus, Parity::Even), -1);
        assert_eq!(signed_effect(Polarized::Up, Parity::Even), 1);
        assert_eq!(signed_effect(Polarized::Down, Parity::Even), -1);
    }

    #[test]
    fn test_effects_invert_at_odd_depth() {
        for op in [Polarized::Plus, Polarized::Minus, Polarized::Up, Polarized::Down] {
            assert_eq!(
                signed_effect(op, Parity::Odd),
                -signed_effect(op, Parity::Even)
            );
        }
    }

    #[test]
    fn test_triangular_sums() {
        assert_eq!(triangular_mod_256(0), 0);
        assert_eq!(triangular_mod_256(1), 1);
        assert_eq!(triangular_mod_256(8), 36);
        assert_eq!(triangular_mod_256(10), 55);
        // 22 * 23 / 2 = 253, 23 * 24 / 2 = 276 = 256 + 20
        assert_eq!(triangular_mod_256(22), 253);
        assert_eq!(triangular_mod_256(23), 20);
    }

    #[test]
    fn test_triangular_matches_direct_sum() {
        for n in 0..2000usize {
            let direct: u64 = (1..=n as u64).sum();
            assert_eq!(triangular_mod_256(n), (direct % 256) as i64, "n = {}", n);
        }
    }

    #[test]
    fn test_triangular_huge_run_does_not_overflow() {
        let n = usize::MAX / 2;
        let expected = ((n as u128) * (n as u128 + 1) / 2 % 256) as i64;
        assert_eq!(triangular_mod_256(n), expected);
    }
}
