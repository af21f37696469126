//! Character input for `,`
//!
//! The interpreter pulls one character at a time through [`InputSource`].
//! [`ReaderInput`] decodes UTF-8 from any byte stream (stdin in the CLI) and
//! [`ScriptedInput`] serves a fixed string, which is what tests and the
//! `--input` flag use.

use std::collections::VecDeque;
use std::io::{self, Read};

/// A source of single characters
pub trait InputSource {
    /// Next character, or `None` at end of input
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

/// Decodes UTF-8 characters from a byte reader, one at a time
pub struct ReaderInput<R: Read> {
    reader: R,
}

impl<R: Read> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        ReaderInput { reader }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl ReaderInput<io::Stdin> {
    pub fn stdin() -> Self {
        ReaderInput::new(io::stdin())
    }
}

impl<R: Read> InputSource for ReaderInput<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };

        let width = match first {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid_utf8()),
        };

        let mut buf = [first, 0, 0, 0];
        self.reader.read_exact(&mut buf[1..width]).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                invalid_utf8()
            } else {
                e
            }
        })?;

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(invalid_utf8)
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "input is not valid UTF-8")
}

/// Input served from an in-memory string
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    chars: VecDeque<char>,
}

impl ScriptedInput {
    pub fn new(text: &str) -> Self {
        ScriptedInput {
            chars: text.chars().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &mut impl InputSource) -> Vec<char> {
        let mut out = Vec::new();
        while let Some(c) = input.read_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_reader_decodes_multibyte() {
        let mut input = ReaderInput::new("aé€😀".as_bytes());
        assert_eq!(drain(&mut input), vec!['a', 'é', '€', '😀']);
    }

    #[test]
    fn test_reader_rejects_truncated_sequence() {
        let bytes: &[u8] = &[0xE2, 0x82];
        let mut input = ReaderInput::new(bytes);
        let err = input.read_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_reader_rejects_stray_continuation() {
        let bytes: &[u8] = &[0x80];
        let mut input = ReaderInput::new(bytes);
        assert!(input.read_char().is_err());
    }

    #[test]
    fn test_scripted_input_ends() {
        let mut input = ScriptedInput::new("hi");
        assert_eq!(drain(&mut input), vec!['h', 'i']);
        assert_eq!(input.read_char().unwrap(), None);
    }
}
